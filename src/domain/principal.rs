//! Authenticated caller and the capability check every operation runs once.

use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Employee,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "employee" => Some(Self::Employee),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Employees, managers and admins.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is asking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: UserRole,
    /// Customer record linked to the user, if any
    pub customer_id: Option<i32>,
}

/// What an operation requires of its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Anyone,
    StaffOnly,
    ManagerOrAdmin,
    AdminOnly,
    /// Staff, or the customer owning the resource
    OwnerOrStaff(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Principal {
    pub fn new(user_id: i32, role: UserRole, customer_id: Option<i32>) -> Self {
        Self {
            user_id,
            role,
            customer_id,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn owns(&self, customer_id: i32) -> bool {
        self.customer_id == Some(customer_id)
    }

    pub fn authorize(&self, policy: AccessPolicy) -> Access {
        let allowed = match policy {
            AccessPolicy::Anyone => true,
            AccessPolicy::StaffOnly => self.is_staff(),
            AccessPolicy::ManagerOrAdmin => {
                matches!(self.role, UserRole::Manager | UserRole::Admin)
            }
            AccessPolicy::AdminOnly => self.role == UserRole::Admin,
            AccessPolicy::OwnerOrStaff(owner) => self.is_staff() || self.owns(owner),
        };
        if allowed {
            Access::Allow
        } else {
            Access::Deny
        }
    }

    /// `authorize`, turning a denial into `Forbidden` naming only the action.
    pub fn ensure(&self, policy: AccessPolicy, action: &str) -> DomainResult<()> {
        match self.authorize(policy) {
            Access::Allow => Ok(()),
            Access::Deny => Err(DomainError::Forbidden(format!("Access denied: {}", action))),
        }
    }

    /// Resolve the customer filter for a list query.
    ///
    /// Staff may pass any filter (or none). Customers always get their own
    /// id; asking for someone else's list is denied. `Ok(None)` for staff
    /// means "everything".
    pub fn scope_customer_filter(
        &self,
        requested: Option<i32>,
        action: &str,
    ) -> DomainResult<CustomerScope> {
        if self.is_staff() {
            return Ok(match requested {
                Some(id) => CustomerScope::Only(id),
                None => CustomerScope::All,
            });
        }
        match (self.customer_id, requested) {
            (Some(own), Some(other)) if own != other => {
                Err(DomainError::Forbidden(format!("Access denied: {}", action)))
            }
            (Some(own), _) => Ok(CustomerScope::Only(own)),
            (None, _) => Ok(CustomerScope::Nothing),
        }
    }
}

/// Result of narrowing a list query to what the caller may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerScope {
    All,
    Only(i32),
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i32) -> Principal {
        Principal::new(100 + id, UserRole::Customer, Some(id))
    }

    fn staff(role: UserRole) -> Principal {
        Principal::new(1, role, None)
    }

    #[test]
    fn owner_or_staff() {
        assert_eq!(customer(5).authorize(AccessPolicy::OwnerOrStaff(5)), Access::Allow);
        assert_eq!(customer(5).authorize(AccessPolicy::OwnerOrStaff(6)), Access::Deny);
        assert_eq!(
            staff(UserRole::Employee).authorize(AccessPolicy::OwnerOrStaff(6)),
            Access::Allow
        );
    }

    #[test]
    fn customer_without_record_owns_nothing() {
        let p = Principal::new(9, UserRole::Customer, None);
        assert_eq!(p.authorize(AccessPolicy::OwnerOrStaff(9)), Access::Deny);
    }

    #[test]
    fn role_tiers() {
        assert_eq!(staff(UserRole::Employee).authorize(AccessPolicy::StaffOnly), Access::Allow);
        assert_eq!(customer(1).authorize(AccessPolicy::StaffOnly), Access::Deny);
        assert_eq!(
            staff(UserRole::Employee).authorize(AccessPolicy::ManagerOrAdmin),
            Access::Deny
        );
        assert_eq!(
            staff(UserRole::Manager).authorize(AccessPolicy::ManagerOrAdmin),
            Access::Allow
        );
        assert_eq!(staff(UserRole::Manager).authorize(AccessPolicy::AdminOnly), Access::Deny);
        assert_eq!(staff(UserRole::Admin).authorize(AccessPolicy::AdminOnly), Access::Allow);
    }

    #[test]
    fn ensure_hides_details() {
        let err = customer(1).ensure(AccessPolicy::StaffOnly, "confirm reservation").unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: Access denied: confirm reservation");
    }

    #[test]
    fn list_scope() {
        assert_eq!(
            customer(3).scope_customer_filter(None, "list").unwrap(),
            CustomerScope::Only(3)
        );
        assert!(customer(3).scope_customer_filter(Some(4), "list").is_err());
        assert_eq!(
            staff(UserRole::Admin).scope_customer_filter(None, "list").unwrap(),
            CustomerScope::All
        );
        assert_eq!(
            Principal::new(2, UserRole::Customer, None)
                .scope_customer_filter(None, "list")
                .unwrap(),
            CustomerScope::Nothing
        );
    }

    #[test]
    fn role_round_trip_strings() {
        for role in [UserRole::Customer, UserRole::Employee, UserRole::Manager, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("root"), None);
    }
}
