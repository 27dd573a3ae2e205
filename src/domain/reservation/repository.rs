//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation};
use crate::shared::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new pending reservation
    async fn insert(&self, reservation: NewReservation, now: DateTime<Utc>) -> DomainResult<Reservation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Newest first; `None` lists every customer
    async fn find_all(&self, customer_id: Option<i32>) -> DomainResult<Vec<Reservation>>;

    /// Pending or confirmed reservations on any of `car_ids`
    async fn find_blocking_for_cars(&self, car_ids: &[i32]) -> DomainResult<Vec<Reservation>>;

    async fn update(&self, reservation: &Reservation) -> DomainResult<()>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
