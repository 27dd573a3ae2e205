//! Reservation DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::reservation::{NewReservation, Reservation, ReservationChanges};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    pub reservation_date: DateTime<Utc>,
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    /// pending, confirmed, cancelled, completed
    pub status: String,
    pub advance_payment: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            car_id: r.car_id,
            customer_id: r.customer_id,
            reservation_date: r.reservation_date,
            pickup_date: r.pickup_date,
            return_date: r.return_date,
            pickup_location_id: r.pickup_location_id,
            return_location_id: r.return_location_id,
            status: r.status.as_str().to_string(),
            advance_payment: r.advance_payment,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i32,
    /// Defaults to the caller's own customer record
    #[validate(range(min = 1))]
    pub customer_id: Option<i32>,
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub pickup_location_id: Option<i32>,
    #[validate(range(min = 1))]
    pub return_location_id: Option<i32>,
    pub advance_payment: Option<Decimal>,
}

impl CreateReservationRequest {
    pub fn into_domain(self, customer_id: i32) -> NewReservation {
        NewReservation {
            car_id: self.car_id,
            customer_id,
            pickup_date: self.pickup_date,
            return_date: self.return_date,
            pickup_location_id: self.pickup_location_id,
            return_location_id: self.return_location_id,
            advance_payment: self.advance_payment,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationRequest {
    #[validate(range(min = 1))]
    pub pickup_location_id: Option<i32>,
    #[validate(range(min = 1))]
    pub return_location_id: Option<i32>,
    pub advance_payment: Option<Decimal>,
}

impl From<UpdateReservationRequest> for ReservationChanges {
    fn from(r: UpdateReservationRequest) -> Self {
        Self {
            pickup_location_id: r.pickup_location_id,
            return_location_id: r.return_location_id,
            advance_payment: r.advance_payment,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListReservationsQuery {
    /// Staff only; customers always see their own
    pub customer_id: Option<i32>,
}
