pub mod service;

pub use service::InsuranceService;
