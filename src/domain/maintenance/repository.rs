//! Maintenance repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{Maintenance, NewMaintenance};
use crate::shared::DomainResult;

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn insert(&self, record: NewMaintenance, now: DateTime<Utc>) -> DomainResult<Maintenance>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Maintenance>>;

    /// Latest maintenance date first; `None` lists every car
    async fn find_all(&self, car_id: Option<i32>) -> DomainResult<Vec<Maintenance>>;

    /// Scheduled or in-progress records of `car_id` falling on `day` (UTC)
    async fn find_open_on(&self, car_id: i32, day: NaiveDate) -> DomainResult<Vec<Maintenance>>;

    /// In-progress records of `car_id`
    async fn find_in_progress(&self, car_id: i32) -> DomainResult<Vec<Maintenance>>;

    async fn update(&self, record: &Maintenance) -> DomainResult<()>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
