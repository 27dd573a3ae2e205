//! SeaORM implementation of RentalRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::pricing::round_money;
use crate::domain::rental::{NewRental, Rental, RentalRepository, RentalStatus};
use crate::infrastructure::database::entities::rental;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmRentalRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmRentalRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: rental::Model) -> DomainResult<Rental> {
    let status = RentalStatus::from_str(&m.status).ok_or_else(|| {
        DomainError::Internal(format!("rental {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Rental {
        id: m.id,
        car_id: m.car_id,
        customer_id: m.customer_id,
        reservation_id: m.reservation_id,
        rental_start_date: m.rental_start_date,
        rental_end_date: m.rental_end_date,
        actual_return_date: m.actual_return_date,
        total_amount: round_money(m.total_amount),
        late_fee: round_money(m.late_fee),
        status,
        pickup_location_id: m.pickup_location_id,
        return_location_id: m.return_location_id,
        created_at: m.created_at,
    })
}

fn collect(models: Vec<rental::Model>) -> DomainResult<Vec<Rental>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── RentalRepository impl ───────────────────────────────────────

#[async_trait]
impl<C> RentalRepository for SeaOrmRentalRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewRental, now: DateTime<Utc>) -> DomainResult<Rental> {
        debug!("Inserting rental for car {}", new.car_id);

        let model = rental::ActiveModel {
            car_id: Set(new.car_id),
            customer_id: Set(new.customer_id),
            reservation_id: Set(new.reservation_id),
            rental_start_date: Set(new.rental_start_date),
            rental_end_date: Set(new.rental_end_date),
            actual_return_date: Set(None),
            total_amount: Set(round_money(new.total_amount)),
            late_fee: Set(Decimal::ZERO),
            status: Set(RentalStatus::Active.as_str().to_string()),
            pickup_location_id: Set(new.pickup_location_id),
            return_location_id: Set(new.return_location_id),
            created_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Rental>> {
        rental::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, customer_id: Option<i32>) -> DomainResult<Vec<Rental>> {
        let mut query = rental::Entity::find();
        if let Some(id) = customer_id {
            query = query.filter(rental::Column::CustomerId.eq(id));
        }
        let models = query
            .order_by_desc(rental::Column::RentalStartDate)
            .order_by_desc(rental::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_active_for_cars(&self, car_ids: &[i32]) -> DomainResult<Vec<Rental>> {
        if car_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = rental::Entity::find()
            .filter(rental::Column::CarId.is_in(car_ids.iter().copied()))
            .filter(rental::Column::Status.eq(RentalStatus::Active.as_str()))
            .order_by_asc(rental::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn update(&self, r: &Rental) -> DomainResult<()> {
        debug!("Updating rental {}: status={}", r.id, r.status);

        let model = rental::ActiveModel {
            id: Set(r.id),
            car_id: Set(r.car_id),
            customer_id: Set(r.customer_id),
            reservation_id: Set(r.reservation_id),
            rental_start_date: Set(r.rental_start_date),
            rental_end_date: Set(r.rental_end_date),
            actual_return_date: Set(r.actual_return_date),
            total_amount: Set(r.total_amount),
            late_fee: Set(r.late_fee),
            status: Set(r.status.as_str().to_string()),
            pickup_location_id: Set(r.pickup_location_id),
            return_location_id: Set(r.return_location_id),
            created_at: Set(r.created_at),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Rental", r.id),
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = rental::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Rental", id));
        }
        Ok(())
    }
}
