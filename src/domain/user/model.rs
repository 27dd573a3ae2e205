//! Login account

use chrono::{DateTime, Utc};

use crate::domain::principal::{Principal, UserRole};
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    /// Set for customer accounts
    pub customer_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role, self.customer_id)
    }

    /// Counts towards the "at least one active admin" rule
    pub fn is_active_admin(&self) -> bool {
        self.is_active && self.role == UserRole::Admin
    }

    /// Customer accounts stay customers and staff accounts stay staff:
    /// the customer role is tied to the linked customer record.
    pub fn check_role_change(&self, role: UserRole) -> DomainResult<()> {
        let linked = self.customer_id.is_some();
        if linked != (role == UserRole::Customer) {
            return Err(DomainError::Validation(format!(
                "Cannot change a {} account to {}",
                self.role, role
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub customer_id: Option<i32>,
}
