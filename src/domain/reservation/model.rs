//! Reservation domain entity and booking-window rules

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::overlap::{Claim, ClaimSource, DateRange};
use crate::shared::{DomainError, DomainResult};

/// Earliest pickup, relative to now
pub const MIN_LEAD_TIME_HOURS: i64 = 1;
/// Longest reservation
pub const MAX_DURATION_DAYS: i64 = 30;
/// Customers cannot cancel closer to pickup than this
pub const CANCELLATION_CUTOFF_HOURS: i64 = 24;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Created, car held, awaiting staff confirmation
    Pending,
    /// Confirmed by staff
    Confirmed,
    /// Cancelled by owner or staff (terminal)
    Cancelled,
    /// Converted into a rental (terminal)
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether the reservation still holds its car
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    /// When the booking was made
    pub reservation_date: DateTime<Utc>,
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    pub status: ReservationStatus,
    pub advance_payment: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.pickup_date, self.return_date)
    }

    pub fn claim(&self) -> Claim {
        Claim {
            source: ClaimSource::Reservation(self.id),
            range: self.range(),
        }
    }

    pub fn confirm(&mut self) -> DomainResult<()> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::Validation(format!(
                "Only pending reservations can be confirmed (status: {})",
                self.status
            )));
        }
        self.status = ReservationStatus::Confirmed;
        Ok(())
    }

    /// Cancel, enforcing the cutoff before pickup.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Completed => {
                return Err(DomainError::Validation(
                    "Cannot cancel a completed reservation".into(),
                ))
            }
            ReservationStatus::Cancelled => {
                return Err(DomainError::Validation(
                    "Reservation is already cancelled".into(),
                ))
            }
            _ => {}
        }
        if self.pickup_date - now < Duration::hours(CANCELLATION_CUTOFF_HOURS) {
            return Err(DomainError::Validation(format!(
                "Reservations can only be cancelled at least {} hours before pickup",
                CANCELLATION_CUTOFF_HOURS
            )));
        }
        self.status = ReservationStatus::Cancelled;
        Ok(())
    }

    /// Mark as consumed by a rental.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != ReservationStatus::Confirmed {
            return Err(DomainError::Validation(format!(
                "Only confirmed reservations can become rentals (status: {})",
                self.status
            )));
        }
        self.status = ReservationStatus::Completed;
        Ok(())
    }
}

/// Validate a requested booking window against `now`.
pub fn validate_booking_window(range: &DateRange, now: DateTime<Utc>) -> DomainResult<()> {
    if range.start >= range.end {
        return Err(DomainError::Validation(
            "Pickup date must be before return date".into(),
        ));
    }
    if range.start < now {
        return Err(DomainError::Validation(
            "Pickup date cannot be in the past".into(),
        ));
    }
    if range.start < now + Duration::hours(MIN_LEAD_TIME_HOURS) {
        return Err(DomainError::Validation(format!(
            "Reservations must be made at least {} hour(s) in advance",
            MIN_LEAD_TIME_HOURS
        )));
    }
    if range.duration() > Duration::days(MAX_DURATION_DAYS) {
        return Err(DomainError::Validation(format!(
            "Reservation duration cannot exceed {} days",
            MAX_DURATION_DAYS
        )));
    }
    Ok(())
}

/// Input for a new reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub car_id: i32,
    pub customer_id: i32,
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    pub advance_payment: Option<Decimal>,
}

impl NewReservation {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.pickup_date, self.return_date)
    }
}

/// Editable fields of a live reservation. Dates are fixed once booked.
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    pub advance_payment: Option<Decimal>,
}

impl ReservationChanges {
    pub fn apply(self, reservation: &mut Reservation) -> DomainResult<()> {
        if reservation.status.is_terminal() {
            return Err(DomainError::Validation(format!(
                "Cannot modify a {} reservation",
                reservation.status
            )));
        }
        if let Some(amount) = self.advance_payment {
            if amount < Decimal::ZERO {
                return Err(DomainError::Validation(
                    "Advance payment cannot be negative".into(),
                ));
            }
            reservation.advance_payment = Some(amount);
        }
        if let Some(v) = self.pickup_location_id {
            reservation.pickup_location_id = Some(v);
        }
        if let Some(v) = self.return_location_id {
            reservation.return_location_id = Some(v);
        }
        Ok(())
    }
}

/// Fields handed to the rental side once a confirmed reservation is picked up
#[derive(Debug, Clone, PartialEq)]
pub struct RentalHandoff {
    pub reservation_id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub pickup_location_id: Option<i32>,
    pub return_location_id: Option<i32>,
    /// Deposit taken at booking, credited against the rental total
    pub advance_payment: Option<Decimal>,
}

impl RentalHandoff {
    pub fn from_reservation(r: &Reservation) -> Self {
        Self {
            reservation_id: r.id,
            car_id: r.car_id,
            customer_id: r.customer_id,
            rental_start_date: r.pickup_date,
            rental_end_date: r.return_date,
            pickup_location_id: r.pickup_location_id,
            return_location_id: r.return_location_id,
            advance_payment: r.advance_payment,
        }
    }

    /// What is left to collect once the rental total is known.
    pub fn amount_due(&self, total_amount: Decimal) -> Decimal {
        let advance = self.advance_payment.unwrap_or(Decimal::ZERO);
        (total_amount - advance).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap()
    }

    fn sample_reservation(status: ReservationStatus, pickup_in_hours: i64) -> Reservation {
        let pickup = now() + Duration::hours(pickup_in_hours);
        Reservation {
            id: 1,
            car_id: 1,
            customer_id: 5,
            reservation_date: now(),
            pickup_date: pickup,
            return_date: pickup + Duration::days(3),
            pickup_location_id: None,
            return_location_id: None,
            status,
            advance_payment: None,
            created_at: now(),
        }
    }

    #[test]
    fn window_rules() {
        let h = |n: i64| now() + Duration::hours(n);
        assert!(validate_booking_window(&DateRange::new(h(5), h(5)), now()).is_err());
        assert!(validate_booking_window(&DateRange::new(h(6), h(5)), now()).is_err());
        assert!(validate_booking_window(&DateRange::new(h(-1), h(5)), now()).is_err());
        assert!(validate_booking_window(
            &DateRange::new(now() + Duration::minutes(30), h(5)),
            now()
        )
        .is_err());
        assert!(validate_booking_window(&DateRange::new(h(1), h(5)), now()).is_ok());
        assert!(validate_booking_window(&DateRange::new(h(2), h(2) + Duration::days(30)), now()).is_ok());
        assert!(validate_booking_window(
            &DateRange::new(h(2), h(2) + Duration::days(30) + Duration::seconds(1)),
            now()
        )
        .is_err());
    }

    #[test]
    fn confirm_only_from_pending() {
        let mut r = sample_reservation(ReservationStatus::Pending, 48);
        r.confirm().unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.confirm().is_err());
    }

    #[test]
    fn cancellation_cutoff() {
        let mut r = sample_reservation(ReservationStatus::Confirmed, 3);
        assert!(r.cancel(now()).is_err());
        assert_eq!(r.status, ReservationStatus::Confirmed);

        let mut r = sample_reservation(ReservationStatus::Confirmed, 30);
        r.cancel(now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);

        let mut r = sample_reservation(ReservationStatus::Pending, 24);
        assert!(r.cancel(now()).is_ok());
    }

    #[test]
    fn completed_cannot_be_cancelled() {
        let mut r = sample_reservation(ReservationStatus::Completed, 100);
        assert!(r.cancel(now()).is_err());
    }

    #[test]
    fn amend_rejects_terminal() {
        let mut r = sample_reservation(ReservationStatus::Cancelled, 48);
        let changes = ReservationChanges {
            pickup_location_id: Some(2),
            ..Default::default()
        };
        assert!(changes.apply(&mut r).is_err());
    }

    #[test]
    fn handoff_carries_the_deposit() {
        let mut r = sample_reservation(ReservationStatus::Confirmed, 48);
        r.advance_payment = Some(Decimal::from(80));
        let handoff = RentalHandoff::from_reservation(&r);
        assert_eq!(handoff.advance_payment, Some(Decimal::from(80)));
        assert_eq!(handoff.amount_due(Decimal::from(300)), Decimal::from(220));
        assert_eq!(handoff.amount_due(Decimal::from(50)), Decimal::ZERO);

        r.advance_payment = None;
        let handoff = RentalHandoff::from_reservation(&r);
        assert_eq!(handoff.amount_due(Decimal::from(300)), Decimal::from(300));
    }

    #[test]
    fn statuses() {
        assert!(ReservationStatus::Pending.is_blocking());
        assert!(ReservationStatus::Confirmed.is_blocking());
        assert!(!ReservationStatus::Cancelled.is_blocking());
        assert_eq!(ReservationStatus::from_str("confirmed"), Some(ReservationStatus::Confirmed));
    }
}
