//! Customer DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::customer::{Customer, CustomerChanges, NewCustomer};

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub driver_license: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            phone_number: c.phone_number,
            address: c.address,
            driver_license: c.driver_license,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 50, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 5, max = 20, message = "phone number must be 5-20 characters"))]
    pub phone_number: String,
    #[validate(length(max = 200))]
    pub address: String,
    #[validate(length(min = 1, max = 50))]
    pub driver_license: Option<String>,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(r: CreateCustomerRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            phone_number: r.phone_number,
            address: r.address,
            driver_license: r.driver_license,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
}

impl From<UpdateCustomerRequest> for CustomerChanges {
    fn from(r: UpdateCustomerRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            phone_number: r.phone_number,
            address: r.address,
            driver_license: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DriverLicenseRequest {
    #[validate(length(min = 1, max = 50, message = "driver license is required"))]
    pub driver_license: String,
}
