//! SeaORM implementation of ReservationRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::pricing::round_money;
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::infrastructure::database::entities::reservation;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmReservationRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmReservationRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status = ReservationStatus::from_str(&m.status).ok_or_else(|| {
        DomainError::Internal(format!("reservation {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Reservation {
        id: m.id,
        car_id: m.car_id,
        customer_id: m.customer_id,
        reservation_date: m.reservation_date,
        pickup_date: m.pickup_date,
        return_date: m.return_date,
        pickup_location_id: m.pickup_location_id,
        return_location_id: m.return_location_id,
        status,
        advance_payment: m.advance_payment.map(round_money),
        created_at: m.created_at,
    })
}

fn collect(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl<C> ReservationRepository for SeaOrmReservationRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewReservation, now: DateTime<Utc>) -> DomainResult<Reservation> {
        debug!("Inserting reservation for car {}", new.car_id);

        let model = reservation::ActiveModel {
            car_id: Set(new.car_id),
            customer_id: Set(new.customer_id),
            reservation_date: Set(now),
            pickup_date: Set(new.pickup_date),
            return_date: Set(new.return_date),
            pickup_location_id: Set(new.pickup_location_id),
            return_location_id: Set(new.return_location_id),
            status: Set(ReservationStatus::Pending.as_str().to_string()),
            advance_payment: Set(new.advance_payment.map(round_money)),
            created_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, customer_id: Option<i32>) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();
        if let Some(id) = customer_id {
            query = query.filter(reservation::Column::CustomerId.eq(id));
        }
        let models = query
            .order_by_desc(reservation::Column::ReservationDate)
            .order_by_desc(reservation::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_blocking_for_cars(&self, car_ids: &[i32]) -> DomainResult<Vec<Reservation>> {
        if car_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = reservation::Entity::find()
            .filter(reservation::Column::CarId.is_in(car_ids.iter().copied()))
            .filter(reservation::Column::Status.is_in([
                ReservationStatus::Pending.as_str(),
                ReservationStatus::Confirmed.as_str(),
            ]))
            .order_by_asc(reservation::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn update(&self, r: &Reservation) -> DomainResult<()> {
        debug!("Updating reservation {}: status={}", r.id, r.status);

        let model = reservation::ActiveModel {
            id: Set(r.id),
            car_id: Set(r.car_id),
            customer_id: Set(r.customer_id),
            reservation_date: Set(r.reservation_date),
            pickup_date: Set(r.pickup_date),
            return_date: Set(r.return_date),
            pickup_location_id: Set(r.pickup_location_id),
            return_location_id: Set(r.return_location_id),
            status: Set(r.status.as_str().to_string()),
            advance_payment: Set(r.advance_payment),
            created_at: Set(r.created_at),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Reservation", r.id),
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = reservation::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(())
    }
}
