//! Rental repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewRental, Rental};
use crate::shared::DomainResult;

#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Insert a new active rental (late fee 0)
    async fn insert(&self, rental: NewRental, now: DateTime<Utc>) -> DomainResult<Rental>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Rental>>;

    /// Newest first; `None` lists every customer
    async fn find_all(&self, customer_id: Option<i32>) -> DomainResult<Vec<Rental>>;

    /// Active rentals on any of `car_ids`
    async fn find_active_for_cars(&self, car_ids: &[i32]) -> DomainResult<Vec<Rental>>;

    async fn update(&self, rental: &Rental) -> DomainResult<()>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
