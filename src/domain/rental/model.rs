//! Rental domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::overlap::{Claim, ClaimSource, DateRange};
use crate::domain::pricing::{round_money, PricingPolicy};
use crate::shared::{DomainError, DomainResult};

/// Rental status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    /// Car is out with the customer
    Active,
    /// Car returned and billed (terminal)
    Completed,
    Cancelled,
    Overdue,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Overdue => "overdue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Rental {
    pub id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    pub reservation_id: Option<i32>,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    /// Rental price plus any late fee
    pub total_amount: Decimal,
    pub late_fee: Decimal,
    pub status: RentalStatus,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Rental {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.rental_start_date, self.rental_end_date)
    }

    pub fn claim(&self) -> Claim {
        Claim {
            source: ClaimSource::Rental(self.id),
            range: self.range(),
        }
    }

    /// Close the rental: record the return, charge the late fee once.
    pub fn complete(
        &mut self,
        actual_return: DateTime<Utc>,
        pricing: &PricingPolicy,
    ) -> DomainResult<Decimal> {
        if self.status != RentalStatus::Active {
            return Err(DomainError::Validation(format!(
                "Only active rentals can be completed (status: {})",
                self.status
            )));
        }
        if actual_return < self.rental_start_date {
            return Err(DomainError::Validation(
                "Return date cannot be before rental start date".into(),
            ));
        }
        let fee = pricing.late_fee(self.rental_end_date, actual_return);
        self.actual_return_date = Some(actual_return);
        self.late_fee = fee;
        self.total_amount = round_money(self.total_amount + fee);
        self.status = RentalStatus::Completed;
        Ok(fee)
    }
}

/// A rental about to be written. Amounts are always computed, never supplied.
#[derive(Debug, Clone)]
pub struct NewRental {
    pub car_id: i32,
    pub customer_id: i32,
    pub reservation_id: Option<i32>,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
}

/// Staff request for a walk-in rental
#[derive(Debug, Clone)]
pub struct DirectRentalRequest {
    pub car_id: i32,
    pub customer_id: i32,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
}

impl DirectRentalRequest {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.rental_start_date, self.rental_end_date)
    }

    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.rental_start_date >= self.rental_end_date {
            return Err(DomainError::Validation(
                "Rental start date must be before end date".into(),
            ));
        }
        if self.rental_start_date < now {
            return Err(DomainError::Validation(
                "Rental start date cannot be in the past".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap()
    }

    fn sample_rental() -> Rental {
        Rental {
            id: 3,
            car_id: 1,
            customer_id: 5,
            reservation_id: Some(1),
            rental_start_date: start(),
            rental_end_date: start() + Duration::days(3),
            actual_return_date: None,
            total_amount: Decimal::from(300),
            late_fee: Decimal::ZERO,
            status: RentalStatus::Active,
            pickup_location_id: None,
            return_location_id: None,
            created_at: start(),
        }
    }

    #[test]
    fn late_return_adds_fee() {
        let mut r = sample_rental();
        let fee = r
            .complete(start() + Duration::days(5), &PricingPolicy::default())
            .unwrap();
        assert_eq!(fee, Decimal::from(100));
        assert_eq!(r.late_fee, Decimal::from(100));
        assert_eq!(r.total_amount, Decimal::from(400));
        assert_eq!(r.status, RentalStatus::Completed);
    }

    #[test]
    fn second_completion_is_rejected_without_charging() {
        let mut r = sample_rental();
        r.complete(start() + Duration::days(5), &PricingPolicy::default())
            .unwrap();
        let err = r
            .complete(start() + Duration::days(9), &PricingPolicy::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(r.total_amount, Decimal::from(400));
        assert_eq!(r.late_fee, Decimal::from(100));
    }

    #[test]
    fn return_before_start_is_rejected() {
        let mut r = sample_rental();
        assert!(r
            .complete(start() - Duration::hours(1), &PricingPolicy::default())
            .is_err());
        assert_eq!(r.status, RentalStatus::Active);
    }

    #[test]
    fn direct_request_window() {
        let req = DirectRentalRequest {
            car_id: 1,
            customer_id: 5,
            rental_start_date: start(),
            rental_end_date: start(),
            pickup_location_id: None,
            return_location_id: None,
        };
        assert!(req.validate(start() - Duration::hours(1)).is_err());

        let req = DirectRentalRequest {
            rental_end_date: start() + Duration::days(1),
            ..req
        };
        assert!(req.validate(start() - Duration::hours(1)).is_ok());
        assert!(req.validate(start() + Duration::minutes(1)).is_err());
    }
}
