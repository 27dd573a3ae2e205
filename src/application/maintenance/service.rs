//! Workshop records: Scheduled → InProgress → Completed, or → Cancelled.
//!
//! Starting work takes the car out of service; finishing the last
//! in-progress job puts it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::application::context::ServiceContext;
use crate::application::fleet::service::{apply_availability, require_active};
use crate::domain::car::CarAvailability;
use crate::domain::maintenance::{
    Maintenance, MaintenanceChanges, MaintenanceRepository, MaintenanceStatus, NewMaintenance,
};
use crate::domain::{AccessPolicy, Principal, UnitOfWork};
use crate::shared::{DomainError, DomainResult};

pub struct MaintenanceService {
    ctx: ServiceContext,
}

impl MaintenanceService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// One open record per car per calendar day.
    pub async fn schedule(
        &self,
        new: NewMaintenance,
        principal: &Principal,
    ) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "schedule maintenance")?;
        let now = self.ctx.now();
        new.validate(now)?;

        let record = self
            .ctx
            .atomically("schedule maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                require_active(uow.cars().find_by_id_for_update(new.car_id).await?, new.car_id)?;
                let day = new.maintenance_date.date_naive();
                if !uow.maintenance().find_open_on(new.car_id, day).await?.is_empty() {
                    return Err(DomainError::Conflict(format!(
                        "Car {} already has maintenance scheduled on {}",
                        new.car_id, day
                    )));
                }
                let record = uow.maintenance().insert(new, now).await?;
                uow.commit().await?;
                Ok(record)
            })
            .await?;

        metrics::counter!("maintenance_scheduled_total").increment(1);
        info!(
            maintenance_id = record.id,
            car_id = record.car_id,
            kind = record.maintenance_type.as_str(),
            "Maintenance scheduled"
        );
        Ok(record)
    }

    pub async fn update(
        &self,
        maintenance_id: i32,
        changes: MaintenanceChanges,
        principal: &Principal,
    ) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "update maintenance")?;

        self.ctx
            .atomically("update maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut record = lock_record(uow.as_ref(), maintenance_id).await?;
                let moves_date = changes.moves_date();
                changes.apply(&mut record, self.ctx.now())?;
                if moves_date {
                    let clash = uow
                        .maintenance()
                        .find_open_on(record.car_id, record.day())
                        .await?
                        .into_iter()
                        .any(|other| other.id != record.id);
                    if clash {
                        return Err(DomainError::Conflict(format!(
                            "Car {} already has maintenance scheduled on {}",
                            record.car_id,
                            record.day()
                        )));
                    }
                }
                uow.maintenance().update(&record).await?;
                uow.commit().await?;
                info!(maintenance_id, "Maintenance updated");
                Ok(record)
            })
            .await
    }

    /// Begin work. The car must not be reserved or rented out.
    pub async fn start(&self, maintenance_id: i32, principal: &Principal) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "start maintenance")?;

        self.ctx
            .atomically("start maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut record = lock_record(uow.as_ref(), maintenance_id).await?;
                let mut car = require_active(
                    uow.cars().find_by_id_for_update(record.car_id).await?,
                    record.car_id,
                )?;

                let now = self.ctx.now();
                record.start(now)?;
                match car.availability {
                    CarAvailability::Available => {
                        apply_availability(uow.cars(), &mut car, CarAvailability::Maintenance, now)
                            .await?
                    }
                    CarAvailability::Maintenance => {}
                    other => {
                        return Err(DomainError::Conflict(format!(
                            "Car {} is {} and cannot go into the workshop",
                            car.id, other
                        )))
                    }
                }
                uow.maintenance().update(&record).await?;
                uow.commit().await?;
                info!(maintenance_id, car_id = car.id, "Maintenance started");
                Ok(record)
            })
            .await
    }

    pub async fn complete(
        &self,
        maintenance_id: i32,
        actual_cost: Option<Decimal>,
        notes: Option<String>,
        principal: &Principal,
    ) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "complete maintenance")?;

        let record = self
            .ctx
            .atomically("complete maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut record = lock_record(uow.as_ref(), maintenance_id).await?;
                let now = self.ctx.now();
                record.complete(actual_cost, notes, now)?;
                uow.maintenance().update(&record).await?;
                release_car(uow.as_ref(), record.car_id, now).await?;
                uow.commit().await?;
                Ok(record)
            })
            .await?;

        metrics::counter!("maintenance_completed_total").increment(1);
        info!(maintenance_id, car_id = record.car_id, cost = %record.cost, "Maintenance completed");
        Ok(record)
    }

    pub async fn cancel(&self, maintenance_id: i32, principal: &Principal) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "cancel maintenance")?;

        self.ctx
            .atomically("cancel maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                let mut record = lock_record(uow.as_ref(), maintenance_id).await?;
                let now = self.ctx.now();
                let was_running = record.status == MaintenanceStatus::InProgress;
                record.cancel(now)?;
                uow.maintenance().update(&record).await?;
                if was_running {
                    release_car(uow.as_ref(), record.car_id, now).await?;
                }
                uow.commit().await?;
                info!(maintenance_id, car_id = record.car_id, "Maintenance cancelled");
                Ok(record)
            })
            .await
    }

    /// Delete a record that is not in progress.
    pub async fn remove(&self, maintenance_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "delete maintenance")?;

        self.ctx
            .atomically("delete maintenance", async {
                let uow = self.ctx.repos.begin().await?;
                let record = lock_record(uow.as_ref(), maintenance_id).await?;
                if record.status == MaintenanceStatus::InProgress {
                    return Err(DomainError::Validation(
                        "Cannot delete maintenance that is in progress".into(),
                    ));
                }
                uow.maintenance().delete(maintenance_id).await?;
                uow.commit().await?;
                info!(maintenance_id, "Maintenance deleted");
                Ok(())
            })
            .await
    }

    pub async fn get(&self, maintenance_id: i32, principal: &Principal) -> DomainResult<Maintenance> {
        principal.ensure(AccessPolicy::StaffOnly, "view maintenance")?;
        fetch(self.ctx.repos.maintenance(), maintenance_id).await
    }

    pub async fn list(
        &self,
        car_id: Option<i32>,
        principal: &Principal,
    ) -> DomainResult<Vec<Maintenance>> {
        principal.ensure(AccessPolicy::StaffOnly, "list maintenance")?;
        self.ctx.repos.maintenance().find_all(car_id).await
    }
}

/// Lock the record's car, then read the record under that lock.
async fn lock_record(uow: &dyn UnitOfWork, maintenance_id: i32) -> DomainResult<Maintenance> {
    let peek = fetch(uow.maintenance(), maintenance_id).await?;
    uow.cars().find_by_id_for_update(peek.car_id).await?;
    fetch(uow.maintenance(), maintenance_id).await
}

async fn fetch(repo: &dyn MaintenanceRepository, id: i32) -> DomainResult<Maintenance> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Maintenance", id))
}

/// Back to Available once no job on the car is still running.
async fn release_car(uow: &dyn UnitOfWork, car_id: i32, now: DateTime<Utc>) -> DomainResult<()> {
    if !uow.maintenance().find_in_progress(car_id).await?.is_empty() {
        return Ok(());
    }
    if let Some(mut car) = uow.cars().find_by_id_for_update(car_id).await? {
        if car.availability == CarAvailability::Maintenance {
            apply_availability(uow.cars(), &mut car, CarAvailability::Available, now).await?;
        }
    }
    Ok(())
}
