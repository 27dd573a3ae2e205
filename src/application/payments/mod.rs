pub mod service;

pub use service::{PaymentService, RentalBalance};
