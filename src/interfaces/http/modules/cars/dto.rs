//! Car DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::car::{Car, CarAvailability, CarChanges, CarType, FuelType, NewCar};
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct CarDto {
    pub id: i32,
    pub model: String,
    pub manufacturer: String,
    pub year: i32,
    pub color: String,
    /// Sedan, SUV, Hatchback, Coupe, Convertible, Minivan, Truck, Luxury
    pub car_type: String,
    /// Petrol, Diesel, Electric, Hybrid
    pub fuel_type: String,
    /// Price per day
    pub rental_rate: Decimal,
    /// Available, Reserved, Rented, Maintenance
    pub availability: String,
    pub current_location_id: Option<i32>,
    pub license_plate: String,
    pub mileage: i32,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            id: c.id,
            model: c.model,
            manufacturer: c.manufacturer,
            year: c.year,
            color: c.color,
            car_type: c.car_type.as_str().to_string(),
            fuel_type: c.fuel_type.as_str().to_string(),
            rental_rate: c.rental_rate,
            availability: c.availability.as_str().to_string(),
            current_location_id: c.current_location_id,
            license_plate: c.license_plate,
            mileage: c.mileage,
            transmission: c.transmission,
            seats: c.seats,
            doors: c.doors,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100, message = "model is required"))]
    pub model: String,
    #[validate(length(min = 1, max = 100, message = "manufacturer is required"))]
    pub manufacturer: String,
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    pub car_type: String,
    pub fuel_type: String,
    pub rental_rate: Decimal,
    pub current_location_id: Option<i32>,
    #[validate(length(min = 1, max = 20, message = "license plate must be 1-20 characters"))]
    pub license_plate: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub mileage: i32,
    pub transmission: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub seats: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub doors: Option<i32>,
    pub description: Option<String>,
}

impl CreateCarRequest {
    pub fn into_domain(self) -> DomainResult<NewCar> {
        Ok(NewCar {
            car_type: parse_car_type(&self.car_type)?,
            fuel_type: parse_fuel_type(&self.fuel_type)?,
            model: self.model,
            manufacturer: self.manufacturer,
            year: self.year,
            color: self.color,
            rental_rate: self.rental_rate,
            current_location_id: self.current_location_id,
            license_plate: self.license_plate,
            mileage: self.mileage,
            transmission: self.transmission,
            seats: self.seats,
            doors: self.doors,
            description: self.description,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub car_type: Option<String>,
    pub fuel_type: Option<String>,
    pub rental_rate: Option<Decimal>,
    pub current_location_id: Option<i32>,
    #[validate(length(min = 1, max = 20))]
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub description: Option<String>,
}

impl UpdateCarRequest {
    pub fn into_domain(self) -> DomainResult<CarChanges> {
        Ok(CarChanges {
            car_type: self.car_type.as_deref().map(parse_car_type).transpose()?,
            fuel_type: self.fuel_type.as_deref().map(parse_fuel_type).transpose()?,
            model: self.model,
            manufacturer: self.manufacturer,
            year: self.year,
            color: self.color,
            rental_rate: self.rental_rate,
            current_location_id: self.current_location_id,
            license_plate: self.license_plate,
            mileage: self.mileage,
            transmission: self.transmission,
            seats: self.seats,
            doors: self.doors,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAvailabilityRequest {
    /// Available, Reserved, Rented, Maintenance
    pub availability: String,
}

impl SetAvailabilityRequest {
    pub fn parse(&self) -> DomainResult<CarAvailability> {
        CarAvailability::from_str(&self.availability).ok_or_else(|| {
            DomainError::Validation(format!("Unknown availability '{}'", self.availability))
        })
    }
}

/// Booking window for availability searches
#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub car_id: i32,
    pub available: bool,
}

fn parse_car_type(s: &str) -> DomainResult<CarType> {
    CarType::from_str(s).ok_or_else(|| DomainError::Validation(format!("Unknown car type '{}'", s)))
}

fn parse_fuel_type(s: &str) -> DomainResult<FuelType> {
    FuelType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("Unknown fuel type '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enums_are_bad_requests() {
        let req = UpdateCarRequest {
            car_type: Some("Spaceship".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_domain(), Err(DomainError::Validation(_))));

        let req = UpdateCarRequest {
            car_type: Some("SUV".into()),
            fuel_type: Some("Hybrid".into()),
            ..Default::default()
        };
        let changes = req.into_domain().unwrap();
        assert_eq!(changes.car_type, Some(CarType::Suv));
        assert_eq!(changes.fuel_type, Some(FuelType::Hybrid));
    }
}
