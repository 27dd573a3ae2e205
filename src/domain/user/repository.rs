//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewUser, User};
use crate::domain::principal::UserRole;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser, now: DateTime<Utc>) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Ordered by id; `None` lists every role
    async fn find_all(&self, role: Option<UserRole>) -> DomainResult<Vec<User>>;

    async fn count(&self) -> DomainResult<u64>;

    /// Active accounts holding `role`
    async fn count_active_with_role(&self, role: UserRole) -> DomainResult<u64>;

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> DomainResult<()>;

    /// Persist role, active flag and password hash
    async fn update(&self, user: &User) -> DomainResult<()>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
