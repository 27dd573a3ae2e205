pub mod auth;
pub mod cars;
pub mod customers;
pub mod health;
pub mod insurance;
pub mod locations;
pub mod maintenance;
pub mod metrics;
pub mod payments;
pub mod rentals;
pub mod request_id;
pub mod reservations;
pub mod users;
