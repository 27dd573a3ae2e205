pub mod service;

pub use service::LocationService;
