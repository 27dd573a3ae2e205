pub mod model;
pub mod repository;

pub use model::{
    validate_booking_window, NewReservation, RentalHandoff, Reservation, ReservationChanges,
    ReservationStatus, CANCELLATION_CUTOFF_HOURS, MAX_DURATION_DAYS, MIN_LEAD_TIME_HOURS,
};
pub use repository::ReservationRepository;
