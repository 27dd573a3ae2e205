pub mod model;
pub mod repository;

pub use model::{DirectRentalRequest, NewRental, Rental, RentalStatus};
pub use repository::RentalRepository;
