//! Customer domain entity

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    /// Required before the customer can book
    pub driver_license: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn can_book(&self) -> bool {
        self.driver_license
            .as_deref()
            .map(|l| !l.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub driver_license: Option<String>,
}

impl NewCustomer {
    pub fn validate(&self) -> DomainResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(DomainError::Validation("Customer name is required".into()));
        }
        if self.phone_number.trim().is_empty() {
            return Err(DomainError::Validation("Phone number is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub driver_license: Option<String>,
}

impl CustomerChanges {
    pub fn apply(self, customer: &mut Customer) {
        if let Some(v) = self.first_name {
            customer.first_name = v;
        }
        if let Some(v) = self.last_name {
            customer.last_name = v;
        }
        if let Some(v) = self.phone_number {
            customer.phone_number = v;
        }
        if let Some(v) = self.address {
            customer.address = v;
        }
        if let Some(v) = self.driver_license {
            customer.driver_license = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer(license: Option<&str>) -> Customer {
        Customer {
            id: 5,
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            phone_number: "+254700000000".into(),
            address: "Nairobi".into(),
            driver_license: license.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn booking_requires_license() {
        assert!(!sample_customer(None).can_book());
        assert!(!sample_customer(Some("  ")).can_book());
        assert!(sample_customer(Some("DL-123")).can_book());
    }

    #[test]
    fn changes_keep_unset_fields() {
        let mut c = sample_customer(None);
        CustomerChanges {
            driver_license: Some("DL-9".into()),
            ..Default::default()
        }
        .apply(&mut c);
        assert_eq!(c.driver_license.as_deref(), Some("DL-9"));
        assert_eq!(c.full_name(), "Amina Otieno");
    }
}
