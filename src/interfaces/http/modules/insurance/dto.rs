//! Insurance DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::insurance::{Insurance, InsuranceChanges, NewInsurance};

#[derive(Debug, Serialize, ToSchema)]
pub struct InsuranceDto {
    pub id: i32,
    pub car_id: i32,
    pub provider: String,
    pub policy_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub premium_amount: Decimal,
    /// active, expired, cancelled
    pub status: String,
    pub coverage_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Insurance> for InsuranceDto {
    fn from(p: Insurance) -> Self {
        Self {
            id: p.id,
            car_id: p.car_id,
            provider: p.provider,
            policy_number: p.policy_number,
            start_date: p.start_date,
            end_date: p.end_date,
            premium_amount: p.premium_amount,
            status: p.status.as_str().to_string(),
            coverage_details: p.coverage_details,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInsuranceRequest {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i32,
    #[validate(length(min = 1, max = 255, message = "provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, max = 50, message = "policy number must be 1-50 characters"))]
    pub policy_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub premium_amount: Decimal,
    pub coverage_details: Option<String>,
}

impl From<CreateInsuranceRequest> for NewInsurance {
    fn from(r: CreateInsuranceRequest) -> Self {
        Self {
            car_id: r.car_id,
            provider: r.provider,
            policy_number: r.policy_number,
            start_date: r.start_date,
            end_date: r.end_date,
            premium_amount: r.premium_amount,
            coverage_details: r.coverage_details,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInsuranceRequest {
    #[validate(length(min = 1, max = 255))]
    pub provider: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub premium_amount: Option<Decimal>,
    pub coverage_details: Option<String>,
}

impl From<UpdateInsuranceRequest> for InsuranceChanges {
    fn from(r: UpdateInsuranceRequest) -> Self {
        Self {
            provider: r.provider,
            start_date: r.start_date,
            end_date: r.end_date,
            premium_amount: r.premium_amount,
            coverage_details: r.coverage_details,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenewInsuranceRequest {
    pub new_end_date: DateTime<Utc>,
    /// Keeps the current premium when absent
    pub premium_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListInsuranceQuery {
    pub car_id: Option<i32>,
}
