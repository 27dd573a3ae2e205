//! Application layer: one service per aggregate, each owning its
//! transaction boundary.

pub mod context;
pub mod customers;
pub mod fleet;
pub mod identity;
pub mod insurance;
pub mod locations;
pub mod maintenance;
pub mod payments;
pub mod rentals;
pub mod reservations;

pub use context::ServiceContext;
pub use customers::CustomerService;
pub use fleet::CarRegistry;
pub use identity::{AuthResult, IdentityService, Registration, UserStats};
pub use insurance::InsuranceService;
pub use locations::LocationService;
pub use maintenance::MaintenanceService;
pub use payments::{PaymentService, RentalBalance};
pub use rentals::{RentalReturn, RentalService};
pub use reservations::ReservationService;
