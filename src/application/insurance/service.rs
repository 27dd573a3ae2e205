//! Insurance policies per car. At most one active policy covers a car at
//! any moment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::application::context::ServiceContext;
use crate::application::fleet::service::require_active;
use crate::domain::insurance::{
    Insurance, InsuranceChanges, InsuranceRepository, NewInsurance,
};
use crate::domain::overlap::DateRange;
use crate::domain::{AccessPolicy, Principal, UnitOfWork};
use crate::shared::{DomainError, DomainResult};

pub struct InsuranceService {
    ctx: ServiceContext,
}

impl InsuranceService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, new: NewInsurance, principal: &Principal) -> DomainResult<Insurance> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "create insurance")?;
        new.validate()?;

        let policy = self
            .ctx
            .atomically("create insurance", async {
                let uow = self.ctx.repos.begin().await?;
                require_active(uow.cars().find_by_id_for_update(new.car_id).await?, new.car_id)?;
                if uow
                    .insurance()
                    .find_by_policy_number(&new.policy_number)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::Conflict(format!(
                        "Policy number {} already exists",
                        new.policy_number
                    )));
                }
                ensure_no_overlap(uow.insurance(), new.car_id, &new.range(), None).await?;
                let policy = uow.insurance().insert(new, self.ctx.now()).await?;
                uow.commit().await?;
                Ok(policy)
            })
            .await?;

        info!(
            insurance_id = policy.id,
            car_id = policy.car_id,
            policy_number = %policy.policy_number,
            "Insurance created"
        );
        Ok(policy)
    }

    pub async fn update(
        &self,
        insurance_id: i32,
        changes: InsuranceChanges,
        principal: &Principal,
    ) -> DomainResult<Insurance> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "update insurance")?;

        self.ctx
            .atomically("update insurance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut policy = lock_policy(uow.as_ref(), insurance_id).await?;
                let moves_period = changes.moves_period();
                changes.apply(&mut policy, self.ctx.now())?;
                if moves_period {
                    ensure_no_overlap(uow.insurance(), policy.car_id, &policy.range(), Some(policy.id))
                        .await?;
                }
                uow.insurance().update(&policy).await?;
                uow.commit().await?;
                info!(insurance_id, "Insurance updated");
                Ok(policy)
            })
            .await
    }

    /// Extend an active policy, optionally at a new premium.
    pub async fn renew(
        &self,
        insurance_id: i32,
        new_end_date: DateTime<Utc>,
        new_premium: Option<Decimal>,
        principal: &Principal,
    ) -> DomainResult<Insurance> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "renew insurance")?;

        let policy = self
            .ctx
            .atomically("renew insurance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut policy = lock_policy(uow.as_ref(), insurance_id).await?;
                policy.renew(new_end_date, new_premium, self.ctx.now())?;
                ensure_no_overlap(uow.insurance(), policy.car_id, &policy.range(), Some(policy.id))
                    .await?;
                uow.insurance().update(&policy).await?;
                uow.commit().await?;
                Ok(policy)
            })
            .await?;

        metrics::counter!("insurance_renewed_total").increment(1);
        info!(insurance_id, end_date = %policy.end_date, "Insurance renewed");
        Ok(policy)
    }

    pub async fn remove(&self, insurance_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::AdminOnly, "delete insurance")?;
        self.ctx.repos.insurance().delete(insurance_id).await?;
        info!(insurance_id, "Insurance deleted");
        Ok(())
    }

    pub async fn get(&self, insurance_id: i32) -> DomainResult<Insurance> {
        fetch(self.ctx.repos.insurance(), insurance_id).await
    }

    pub async fn list(&self, car_id: Option<i32>) -> DomainResult<Vec<Insurance>> {
        self.ctx.repos.insurance().find_all(car_id).await
    }

    /// Policies covering their car right now.
    pub async fn list_in_force(&self) -> DomainResult<Vec<Insurance>> {
        self.ctx.repos.insurance().find_in_force(self.ctx.now()).await
    }
}

async fn lock_policy(
    uow: &dyn UnitOfWork,
    insurance_id: i32,
) -> DomainResult<Insurance> {
    let peek = fetch(uow.insurance(), insurance_id).await?;
    uow.cars().find_by_id_for_update(peek.car_id).await?;
    fetch(uow.insurance(), insurance_id).await
}

async fn fetch(repo: &dyn InsuranceRepository, id: i32) -> DomainResult<Insurance> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Insurance", id))
}

async fn ensure_no_overlap(
    repo: &dyn InsuranceRepository,
    car_id: i32,
    range: &DateRange,
    ignore: Option<i32>,
) -> DomainResult<()> {
    let clash = repo
        .find_active_for_car(car_id)
        .await?
        .into_iter()
        .filter(|p| Some(p.id) != ignore)
        .find(|p| p.range().overlaps(range));
    if let Some(existing) = clash {
        return Err(DomainError::Conflict(format!(
            "Car {} is already covered by policy {} in this period",
            car_id, existing.policy_number
        )));
    }
    Ok(())
}
