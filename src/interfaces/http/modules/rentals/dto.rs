//! Rental DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::rental::{DirectRentalRequest, Rental};
use crate::domain::reservation::RentalHandoff;

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalDto {
    pub id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    pub reservation_id: Option<i32>,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    /// Rental price plus late fee
    pub total_amount: Decimal,
    pub late_fee: Decimal,
    /// active, completed, cancelled, overdue
    pub status: String,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Rental> for RentalDto {
    fn from(r: Rental) -> Self {
        Self {
            id: r.id,
            car_id: r.car_id,
            customer_id: r.customer_id,
            reservation_id: r.reservation_id,
            rental_start_date: r.rental_start_date,
            rental_end_date: r.rental_end_date,
            actual_return_date: r.actual_return_date,
            total_amount: r.total_amount,
            late_fee: r.late_fee,
            status: r.status.as_str().to_string(),
            pickup_location_id: r.pickup_location_id,
            return_location_id: r.return_location_id,
            created_at: r.created_at,
        }
    }
}

/// Rental started at pickup, with the booking deposit credited
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertedRentalDto {
    pub rental: RentalDto,
    pub advance_payment: Option<Decimal>,
    /// Rental total minus the deposit
    pub amount_due: Decimal,
}

impl ConvertedRentalDto {
    pub fn new(rental: Rental, handoff: &RentalHandoff) -> Self {
        let amount_due = handoff.amount_due(rental.total_amount);
        Self {
            rental: rental.into(),
            advance_payment: handoff.advance_payment,
            amount_due,
        }
    }
}

/// Walk-in rental. Amounts are computed server side.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRentalRequest {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i32,
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i32,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub pickup_location_id: Option<i32>,
    #[validate(range(min = 1))]
    pub return_location_id: Option<i32>,
}

impl From<CreateRentalRequest> for DirectRentalRequest {
    fn from(r: CreateRentalRequest) -> Self {
        Self {
            car_id: r.car_id,
            customer_id: r.customer_id,
            rental_start_date: r.rental_start_date,
            rental_end_date: r.rental_end_date,
            pickup_location_id: r.pickup_location_id,
            return_location_id: r.return_location_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RentalFromReservationRequest {
    pub reservation_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CompleteRentalRequest {
    /// Defaults to now
    pub actual_return_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub final_mileage: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRentalsQuery {
    /// Staff only; customers always see their own
    pub customer_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(car_id: i32, pickup_location_id: Option<i32>) -> CreateRentalRequest {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        CreateRentalRequest {
            car_id,
            customer_id: 3,
            rental_start_date: start,
            rental_end_date: start + chrono::Duration::days(2),
            pickup_location_id,
            return_location_id: None,
        }
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(request(1, Some(2)).validate().is_ok());
        assert!(request(1, None).validate().is_ok());
        assert!(request(0, None).validate().is_err());
        assert!(request(-4, None).validate().is_err());
        assert!(request(1, Some(0)).validate().is_err());
    }
}
