//! Maintenance DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::maintenance::{
    Maintenance, MaintenanceChanges, MaintenanceType, NewMaintenance,
};
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceDto {
    pub id: i32,
    pub car_id: i32,
    /// routine, repair, accident, upgrade
    pub maintenance_type: String,
    /// scheduled, in_progress, completed, cancelled
    pub status: String,
    pub maintenance_date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Maintenance> for MaintenanceDto {
    fn from(m: Maintenance) -> Self {
        Self {
            id: m.id,
            car_id: m.car_id,
            maintenance_type: m.maintenance_type.as_str().to_string(),
            status: m.status.as_str().to_string(),
            maintenance_date: m.maintenance_date,
            description: m.description,
            cost: m.cost,
            completed_date: m.completed_date,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceRequest {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i32,
    /// routine, repair, accident, upgrade
    pub maintenance_type: String,
    pub maintenance_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "description must be 1-255 characters"))]
    pub description: String,
    pub cost: Decimal,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateMaintenanceRequest {
    pub fn into_domain(self) -> DomainResult<NewMaintenance> {
        Ok(NewMaintenance {
            car_id: self.car_id,
            maintenance_type: parse_type(&self.maintenance_type)?,
            maintenance_date: self.maintenance_date,
            description: self.description,
            cost: self.cost,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenanceRequest {
    pub maintenance_type: Option<String>,
    pub maintenance_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl UpdateMaintenanceRequest {
    pub fn into_domain(self) -> DomainResult<MaintenanceChanges> {
        let maintenance_type = self.maintenance_type.as_deref().map(parse_type).transpose()?;
        Ok(MaintenanceChanges {
            maintenance_type,
            maintenance_date: self.maintenance_date,
            description: self.description,
            cost: self.cost,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CompleteMaintenanceRequest {
    /// Final bill; keeps the estimate when absent
    pub actual_cost: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMaintenanceQuery {
    pub car_id: Option<i32>,
}

fn parse_type(s: &str) -> DomainResult<MaintenanceType> {
    MaintenanceType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("Unknown maintenance type '{}'", s)))
}
