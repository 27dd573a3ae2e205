pub mod model;
pub mod repository;

pub use model::{Location, LocationChanges, NewLocation};
pub use repository::LocationRepository;
