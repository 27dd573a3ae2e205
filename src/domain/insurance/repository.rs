//! Insurance repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Insurance, NewInsurance};
use crate::shared::DomainResult;

#[async_trait]
pub trait InsuranceRepository: Send + Sync {
    async fn insert(&self, policy: NewInsurance, now: DateTime<Utc>) -> DomainResult<Insurance>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Insurance>>;

    async fn find_by_policy_number(&self, policy_number: &str) -> DomainResult<Option<Insurance>>;

    /// Latest start date first; `None` lists every car
    async fn find_all(&self, car_id: Option<i32>) -> DomainResult<Vec<Insurance>>;

    /// Policies of `car_id` with status active, whatever their dates
    async fn find_active_for_car(&self, car_id: i32) -> DomainResult<Vec<Insurance>>;

    /// Active policies whose period contains `at`
    async fn find_in_force(&self, at: DateTime<Utc>) -> DomainResult<Vec<Insurance>>;

    async fn update(&self, policy: &Insurance) -> DomainResult<()>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
