//! Car domain entity

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

/// Oldest model year the fleet accepts
pub const MIN_MODEL_YEAR: i32 = 2000;

/// Single availability flag per car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarAvailability {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

impl CarAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Rented => "Rented",
            Self::Maintenance => "Maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(Self::Available),
            "Reserved" => Some(Self::Reserved),
            "Rented" => Some(Self::Rented),
            "Maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    /// A rented car can only go back to Available.
    pub fn can_transition_to(&self, next: CarAvailability) -> bool {
        match self {
            Self::Rented => next == Self::Available,
            _ => true,
        }
    }
}

impl std::fmt::Display for CarAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarType {
    Sedan,
    Suv,
    Hatchback,
    Coupe,
    Convertible,
    Minivan,
    Truck,
    Luxury,
}

impl CarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Hatchback => "Hatchback",
            Self::Coupe => "Coupe",
            Self::Convertible => "Convertible",
            Self::Minivan => "Minivan",
            Self::Truck => "Truck",
            Self::Luxury => "Luxury",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Sedan" => Some(Self::Sedan),
            "SUV" => Some(Self::Suv),
            "Hatchback" => Some(Self::Hatchback),
            "Coupe" => Some(Self::Coupe),
            "Convertible" => Some(Self::Convertible),
            "Minivan" => Some(Self::Minivan),
            "Truck" => Some(Self::Truck),
            "Luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Petrol" => Some(Self::Petrol),
            "Diesel" => Some(Self::Diesel),
            "Electric" => Some(Self::Electric),
            "Hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Fleet vehicle
#[derive(Debug, Clone)]
pub struct Car {
    pub id: i32,
    pub model: String,
    pub manufacturer: String,
    pub year: i32,
    pub color: String,
    pub car_type: CarType,
    pub fuel_type: FuelType,
    /// Price per day
    pub rental_rate: Decimal,
    pub availability: CarAvailability,
    pub current_location_id: Option<i32>,
    pub license_plate: String,
    pub mileage: i32,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub description: Option<String>,
    /// Soft-delete flag
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Move the availability flag, stamping `updated_at`.
    pub fn transition_to(&mut self, next: CarAvailability, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.availability.can_transition_to(next) {
            return Err(DomainError::Validation(format!(
                "Car {} is {} and can only be made Available",
                self.id, self.availability
            )));
        }
        self.availability = next;
        self.updated_at = now;
        Ok(())
    }

    /// Retire the car. Rented or reserved cars cannot be removed.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.availability {
            CarAvailability::Rented => {
                return Err(DomainError::Validation("Cannot delete a rented car".into()))
            }
            CarAvailability::Reserved => {
                return Err(DomainError::Validation("Cannot delete a reserved car".into()))
            }
            _ => {}
        }
        self.is_active = false;
        self.availability = CarAvailability::Maintenance;
        self.updated_at = now;
        Ok(())
    }
}

/// Input for registering a car
#[derive(Debug, Clone)]
pub struct NewCar {
    pub model: String,
    pub manufacturer: String,
    pub year: i32,
    pub color: String,
    pub car_type: CarType,
    pub fuel_type: FuelType,
    pub rental_rate: Decimal,
    pub current_location_id: Option<i32>,
    pub license_plate: String,
    pub mileage: i32,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub description: Option<String>,
}

impl NewCar {
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        validate_year(self.year, now)?;
        validate_rate(self.rental_rate)?;
        if self.license_plate.trim().is_empty() {
            return Err(DomainError::Validation("License plate is required".into()));
        }
        if self.mileage < 0 {
            return Err(DomainError::Validation("Mileage cannot be negative".into()));
        }
        Ok(())
    }
}

/// Partial update of descriptive attributes
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub car_type: Option<CarType>,
    pub fuel_type: Option<FuelType>,
    pub rental_rate: Option<Decimal>,
    pub current_location_id: Option<i32>,
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub description: Option<String>,
}

impl CarChanges {
    /// Apply to `car`. Plate uniqueness is checked by the caller.
    pub fn apply(self, car: &mut Car, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(rate) = self.rental_rate {
            validate_rate(rate)?;
            if rate != car.rental_rate && car.availability == CarAvailability::Rented {
                return Err(DomainError::Validation(
                    "Cannot change rental rate while car is rented".into(),
                ));
            }
            car.rental_rate = rate;
        }
        if let Some(year) = self.year {
            validate_year(year, now)?;
            car.year = year;
        }
        if let Some(mileage) = self.mileage {
            if mileage < 0 {
                return Err(DomainError::Validation("Mileage cannot be negative".into()));
            }
            car.mileage = mileage;
        }
        if let Some(v) = self.model {
            car.model = v;
        }
        if let Some(v) = self.manufacturer {
            car.manufacturer = v;
        }
        if let Some(v) = self.color {
            car.color = v;
        }
        if let Some(v) = self.car_type {
            car.car_type = v;
        }
        if let Some(v) = self.fuel_type {
            car.fuel_type = v;
        }
        if let Some(v) = self.current_location_id {
            car.current_location_id = Some(v);
        }
        if let Some(v) = self.license_plate {
            car.license_plate = v;
        }
        if let Some(v) = self.transmission {
            car.transmission = Some(v);
        }
        if let Some(v) = self.seats {
            car.seats = Some(v);
        }
        if let Some(v) = self.doors {
            car.doors = Some(v);
        }
        if let Some(v) = self.description {
            car.description = Some(v);
        }
        car.updated_at = now;
        Ok(())
    }
}

fn validate_year(year: i32, now: DateTime<Utc>) -> DomainResult<()> {
    let max = now.year() + 1;
    if year < MIN_MODEL_YEAR || year > max {
        return Err(DomainError::Validation(format!(
            "Invalid car year: must be between {} and {}",
            MIN_MODEL_YEAR, max
        )));
    }
    Ok(())
}

fn validate_rate(rate: Decimal) -> DomainResult<()> {
    if rate <= Decimal::ZERO {
        return Err(DomainError::Validation("Rental rate must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap()
    }

    fn sample_car() -> Car {
        Car {
            id: 1,
            model: "Corolla".into(),
            manufacturer: "Toyota".into(),
            year: 2022,
            color: "White".into(),
            car_type: CarType::Sedan,
            fuel_type: FuelType::Petrol,
            rental_rate: Decimal::from(100),
            availability: CarAvailability::Available,
            current_location_id: None,
            license_plate: "KDA 001A".into(),
            mileage: 1200,
            transmission: None,
            seats: Some(5),
            doors: Some(4),
            description: None,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn sample_new_car(year: i32) -> NewCar {
        NewCar {
            model: "Corolla".into(),
            manufacturer: "Toyota".into(),
            year,
            color: "White".into(),
            car_type: CarType::Sedan,
            fuel_type: FuelType::Petrol,
            rental_rate: Decimal::from(100),
            current_location_id: None,
            license_plate: "KDA 001A".into(),
            mileage: 0,
            transmission: None,
            seats: None,
            doors: None,
            description: None,
        }
    }

    #[test]
    fn rented_only_returns_to_available() {
        let rented = CarAvailability::Rented;
        assert!(rented.can_transition_to(CarAvailability::Available));
        assert!(!rented.can_transition_to(CarAvailability::Reserved));
        assert!(!rented.can_transition_to(CarAvailability::Maintenance));
        assert!(!rented.can_transition_to(CarAvailability::Rented));
        assert!(CarAvailability::Reserved.can_transition_to(CarAvailability::Rented));
    }

    #[test]
    fn transition_stamps_updated_at() {
        let mut car = sample_car();
        let later = now() + chrono::Duration::hours(2);
        car.transition_to(CarAvailability::Reserved, later).unwrap();
        assert_eq!(car.availability, CarAvailability::Reserved);
        assert_eq!(car.updated_at, later);
    }

    #[test]
    fn rejected_transition_leaves_car_untouched() {
        let mut car = sample_car();
        car.availability = CarAvailability::Rented;
        assert!(car.transition_to(CarAvailability::Maintenance, now()).is_err());
        assert_eq!(car.availability, CarAvailability::Rented);
    }

    #[test]
    fn soft_delete_rules() {
        let mut car = sample_car();
        car.availability = CarAvailability::Reserved;
        assert!(car.soft_delete(now()).is_err());
        car.availability = CarAvailability::Rented;
        assert!(car.soft_delete(now()).is_err());
        car.availability = CarAvailability::Available;
        car.soft_delete(now()).unwrap();
        assert!(!car.is_active);
        assert_eq!(car.availability, CarAvailability::Maintenance);
    }

    #[test]
    fn year_window() {
        assert!(sample_new_car(1999).validate(now()).is_err());
        assert!(sample_new_car(2000).validate(now()).is_ok());
        assert!(sample_new_car(2026).validate(now()).is_ok());
        assert!(sample_new_car(2027).validate(now()).is_err());
    }

    #[test]
    fn rate_is_frozen_while_rented() {
        let mut car = sample_car();
        car.availability = CarAvailability::Rented;
        let changes = CarChanges {
            rental_rate: Some(Decimal::from(120)),
            ..Default::default()
        };
        assert!(changes.apply(&mut car, now()).is_err());
        assert_eq!(car.rental_rate, Decimal::from(100));

        let changes = CarChanges {
            color: Some("Blue".into()),
            ..Default::default()
        };
        changes.apply(&mut car, now()).unwrap();
        assert_eq!(car.color, "Blue");
    }

    #[test]
    fn type_strings() {
        assert_eq!(CarType::from_str("SUV"), Some(CarType::Suv));
        assert_eq!(CarType::Suv.as_str(), "SUV");
        assert_eq!(FuelType::from_str("Hybrid"), Some(FuelType::Hybrid));
        assert_eq!(CarAvailability::from_str("Unknown"), None);
    }
}
