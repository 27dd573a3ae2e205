//! SeaORM entities

pub mod car;
pub mod customer;
pub mod insurance;
pub mod location;
pub mod maintenance;
pub mod payment;
pub mod rental;
pub mod reservation;
pub mod user;
