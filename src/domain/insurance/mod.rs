pub mod model;
pub mod repository;

pub use model::{Insurance, InsuranceChanges, InsuranceStatus, NewInsurance};
pub use repository::InsuranceRepository;
