pub mod model;
pub mod repository;

pub use model::{Customer, CustomerChanges, NewCustomer};
pub use repository::CustomerRepository;
