pub mod service;

pub use service::{RentalReturn, RentalService};
