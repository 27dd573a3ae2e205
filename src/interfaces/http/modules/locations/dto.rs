//! Location DTOs

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::location::{Location, LocationChanges, NewLocation};

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub manager_name: Option<String>,
    #[schema(value_type = String, example = "08:00:00")]
    pub opening_time: NaiveTime,
    #[schema(value_type = String, example = "18:00:00")]
    pub closing_time: NaiveTime,
}

impl From<Location> for LocationDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            name: l.name,
            address: l.address,
            contact_number: l.contact_number,
            manager_name: l.manager_name,
            opening_time: l.opening_time,
            closing_time: l.closing_time,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(min = 5, max = 20))]
    pub contact_number: String,
    pub manager_name: Option<String>,
    #[schema(value_type = String, example = "08:00:00")]
    pub opening_time: NaiveTime,
    #[schema(value_type = String, example = "18:00:00")]
    pub closing_time: NaiveTime,
}

impl From<CreateLocationRequest> for NewLocation {
    fn from(r: CreateLocationRequest) -> Self {
        Self {
            name: r.name,
            address: r.address,
            contact_number: r.contact_number,
            manager_name: r.manager_name,
            opening_time: r.opening_time,
            closing_time: r.closing_time,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub address: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub contact_number: Option<String>,
    pub manager_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub closing_time: Option<NaiveTime>,
}

impl From<UpdateLocationRequest> for LocationChanges {
    fn from(r: UpdateLocationRequest) -> Self {
        Self {
            name: r.name,
            address: r.address,
            contact_number: r.contact_number,
            manager_name: r.manager_name,
            opening_time: r.opening_time,
            closing_time: r.closing_time,
        }
    }
}
