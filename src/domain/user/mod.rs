pub mod model;
pub mod repository;

pub use model::{NewUser, User};
pub use repository::UserRepository;
