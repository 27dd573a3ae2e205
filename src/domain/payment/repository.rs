//! Payment repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewPayment, Payment};
use crate::shared::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: NewPayment, now: DateTime<Utc>) -> DomainResult<Payment>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;

    async fn find_for_rental(&self, rental_id: i32) -> DomainResult<Vec<Payment>>;

    async fn update(&self, payment: &Payment) -> DomainResult<()>;
}
