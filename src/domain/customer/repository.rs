//! Customer repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Customer, NewCustomer};
use crate::shared::DomainResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn insert(&self, customer: NewCustomer, now: DateTime<Utc>) -> DomainResult<Customer>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>>;

    async fn find_all(&self) -> DomainResult<Vec<Customer>>;

    async fn update(&self, customer: &Customer) -> DomainResult<()>;
}
