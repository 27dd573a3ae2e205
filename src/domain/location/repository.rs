//! Location repository interface

use async_trait::async_trait;

use super::model::{Location, NewLocation};
use crate::shared::DomainResult;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn insert(&self, location: NewLocation) -> DomainResult<Location>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Location>>;

    /// Active locations only
    async fn find_active(&self) -> DomainResult<Vec<Location>>;

    async fn update(&self, location: &Location) -> DomainResult<()>;
}
