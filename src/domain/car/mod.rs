pub mod model;
pub mod repository;

pub use model::{Car, CarAvailability, CarChanges, CarType, FuelType, NewCar, MIN_MODEL_YEAR};
pub use repository::CarRepository;
