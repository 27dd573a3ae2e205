//! SeaORM implementation of InsuranceRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::insurance::{Insurance, InsuranceRepository, InsuranceStatus, NewInsurance};
use crate::domain::pricing::round_money;
use crate::infrastructure::database::entities::insurance;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmInsuranceRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmInsuranceRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: insurance::Model) -> DomainResult<Insurance> {
    let status = InsuranceStatus::from_str(&m.status).ok_or_else(|| {
        DomainError::Internal(format!("insurance {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Insurance {
        id: m.id,
        car_id: m.car_id,
        provider: m.insurance_provider,
        policy_number: m.policy_number,
        start_date: m.start_date,
        end_date: m.end_date,
        premium_amount: round_money(m.premium_amount),
        status,
        coverage_details: m.coverage_details,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn collect(models: Vec<insurance::Model>) -> DomainResult<Vec<Insurance>> {
    models.into_iter().map(model_to_domain).collect()
}

#[async_trait]
impl<C> InsuranceRepository for SeaOrmInsuranceRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewInsurance, now: DateTime<Utc>) -> DomainResult<Insurance> {
        let model = insurance::ActiveModel {
            car_id: Set(new.car_id),
            insurance_provider: Set(new.provider),
            policy_number: Set(new.policy_number),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            premium_amount: Set(round_money(new.premium_amount)),
            status: Set(InsuranceStatus::Active.as_str().to_string()),
            coverage_details: Set(new.coverage_details),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Insurance>> {
        insurance::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_policy_number(&self, policy_number: &str) -> DomainResult<Option<Insurance>> {
        insurance::Entity::find()
            .filter(insurance::Column::PolicyNumber.eq(policy_number))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, car_id: Option<i32>) -> DomainResult<Vec<Insurance>> {
        let mut query = insurance::Entity::find();
        if let Some(id) = car_id {
            query = query.filter(insurance::Column::CarId.eq(id));
        }
        let models = query
            .order_by_desc(insurance::Column::StartDate)
            .order_by_desc(insurance::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_active_for_car(&self, car_id: i32) -> DomainResult<Vec<Insurance>> {
        let models = insurance::Entity::find()
            .filter(insurance::Column::CarId.eq(car_id))
            .filter(insurance::Column::Status.eq(InsuranceStatus::Active.as_str()))
            .order_by_asc(insurance::Column::StartDate)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_in_force(&self, at: DateTime<Utc>) -> DomainResult<Vec<Insurance>> {
        let models = insurance::Entity::find()
            .filter(insurance::Column::Status.eq(InsuranceStatus::Active.as_str()))
            .filter(insurance::Column::StartDate.lte(at))
            .filter(insurance::Column::EndDate.gte(at))
            .order_by_asc(insurance::Column::CarId)
            .order_by_asc(insurance::Column::StartDate)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn update(&self, p: &Insurance) -> DomainResult<()> {
        let model = insurance::ActiveModel {
            id: Set(p.id),
            car_id: Set(p.car_id),
            insurance_provider: Set(p.provider.clone()),
            policy_number: Set(p.policy_number.clone()),
            start_date: Set(p.start_date),
            end_date: Set(p.end_date),
            premium_amount: Set(round_money(p.premium_amount)),
            status: Set(p.status.as_str().to_string()),
            coverage_details: Set(p.coverage_details.clone()),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Insurance", p.id),
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = insurance::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Insurance", id));
        }
        Ok(())
    }
}
