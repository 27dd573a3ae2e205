//! User administration DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::UserStats;
use crate::domain::UserRole;
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// customer, employee, manager, admin
    pub role: String,
}

impl UpdateRoleRequest {
    pub fn parse(&self) -> DomainResult<UserRole> {
        parse_role(&self.role)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// customer, employee, manager, admin
    pub role: Option<String>,
}

impl ListUsersQuery {
    pub fn parse(&self) -> DomainResult<Option<UserRole>> {
        self.role.as_deref().map(parse_role).transpose()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCountDto {
    pub role: String,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsDto {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: Vec<RoleCountDto>,
}

impl From<UserStats> for UserStatsDto {
    fn from(s: UserStats) -> Self {
        Self {
            total: s.total,
            active: s.active,
            inactive: s.total - s.active,
            by_role: s
                .by_role
                .into_iter()
                .map(|(role, count)| RoleCountDto {
                    role: role.as_str().to_string(),
                    count,
                })
                .collect(),
        }
    }
}

fn parse_role(s: &str) -> DomainResult<UserRole> {
    UserRole::from_str(s).ok_or_else(|| DomainError::Validation(format!("Unknown role '{}'", s)))
}
