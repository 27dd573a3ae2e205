//! Car repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Car, CarAvailability, NewCar};
use crate::shared::DomainResult;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Insert a new car (availability = Available, active)
    async fn insert(&self, car: NewCar, now: DateTime<Utc>) -> DomainResult<Car>;

    /// Find a car by ID, including soft-deleted ones
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Car>>;

    /// Find a car by ID and hold its row lock until the surrounding
    /// transaction ends
    async fn find_by_id_for_update(&self, id: i32) -> DomainResult<Option<Car>>;

    /// Find a car by license plate, including soft-deleted ones
    async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>>;

    /// Active cars, optionally narrowed to one availability state
    async fn find_active(&self, availability: Option<CarAvailability>) -> DomainResult<Vec<Car>>;

    /// Persist every mutable field of `car`
    async fn update(&self, car: &Car) -> DomainResult<()>;
}
