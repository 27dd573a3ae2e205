//! SeaORM implementation of MaintenanceRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::maintenance::{
    Maintenance, MaintenanceRepository, MaintenanceStatus, MaintenanceType, NewMaintenance,
};
use crate::domain::pricing::round_money;
use crate::infrastructure::database::entities::maintenance;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmMaintenanceRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmMaintenanceRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: maintenance::Model) -> DomainResult<Maintenance> {
    let maintenance_type = MaintenanceType::from_str(&m.maintenance_type).ok_or_else(|| {
        DomainError::Internal(format!(
            "maintenance {} has unknown type '{}'",
            m.id, m.maintenance_type
        ))
    })?;
    let status = MaintenanceStatus::from_str(&m.status).ok_or_else(|| {
        DomainError::Internal(format!("maintenance {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Maintenance {
        id: m.id,
        car_id: m.car_id,
        maintenance_type,
        status,
        maintenance_date: m.maintenance_date,
        description: m.description,
        cost: round_money(m.cost),
        completed_date: m.completed_date,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn collect(models: Vec<maintenance::Model>) -> DomainResult<Vec<Maintenance>> {
    models.into_iter().map(model_to_domain).collect()
}

/// `[day 00:00, next day 00:00)` in UTC
fn day_bounds(day: NaiveDate) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| DomainError::Validation(format!("Date {day} is out of range")))?;
    let start = day.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    let end = next.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    match (start, end) {
        (Some(s), Some(e)) => Ok((s, e)),
        _ => Err(DomainError::Validation(format!("Date {day} is out of range"))),
    }
}

#[async_trait]
impl<C> MaintenanceRepository for SeaOrmMaintenanceRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewMaintenance, now: DateTime<Utc>) -> DomainResult<Maintenance> {
        debug!("Scheduling maintenance for car {}", new.car_id);

        let model = maintenance::ActiveModel {
            car_id: Set(new.car_id),
            maintenance_type: Set(new.maintenance_type.as_str().to_string()),
            status: Set(MaintenanceStatus::Scheduled.as_str().to_string()),
            maintenance_date: Set(new.maintenance_date),
            description: Set(new.description),
            cost: Set(round_money(new.cost)),
            completed_date: Set(None),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Maintenance>> {
        maintenance::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, car_id: Option<i32>) -> DomainResult<Vec<Maintenance>> {
        let mut query = maintenance::Entity::find();
        if let Some(id) = car_id {
            query = query.filter(maintenance::Column::CarId.eq(id));
        }
        let models = query
            .order_by_desc(maintenance::Column::MaintenanceDate)
            .order_by_desc(maintenance::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_open_on(&self, car_id: i32, day: NaiveDate) -> DomainResult<Vec<Maintenance>> {
        let (start, end) = day_bounds(day)?;
        let models = maintenance::Entity::find()
            .filter(maintenance::Column::CarId.eq(car_id))
            .filter(maintenance::Column::Status.is_in([
                MaintenanceStatus::Scheduled.as_str(),
                MaintenanceStatus::InProgress.as_str(),
            ]))
            .filter(maintenance::Column::MaintenanceDate.gte(start))
            .filter(maintenance::Column::MaintenanceDate.lt(end))
            .order_by_asc(maintenance::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_in_progress(&self, car_id: i32) -> DomainResult<Vec<Maintenance>> {
        let models = maintenance::Entity::find()
            .filter(maintenance::Column::CarId.eq(car_id))
            .filter(maintenance::Column::Status.eq(MaintenanceStatus::InProgress.as_str()))
            .order_by_asc(maintenance::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn update(&self, m: &Maintenance) -> DomainResult<()> {
        debug!("Updating maintenance {}: status={}", m.id, m.status);

        let model = maintenance::ActiveModel {
            id: Set(m.id),
            car_id: Set(m.car_id),
            maintenance_type: Set(m.maintenance_type.as_str().to_string()),
            status: Set(m.status.as_str().to_string()),
            maintenance_date: Set(m.maintenance_date),
            description: Set(m.description.clone()),
            cost: Set(round_money(m.cost)),
            completed_date: Set(m.completed_date),
            notes: Set(m.notes.clone()),
            created_at: Set(m.created_at),
            updated_at: Set(m.updated_at),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Maintenance", m.id),
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = maintenance::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Maintenance", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_utc_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let (start, end) = day_bounds(day).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-02-28T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }
}
