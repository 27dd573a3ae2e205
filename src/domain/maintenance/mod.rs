pub mod model;
pub mod repository;

pub use model::{
    Maintenance, MaintenanceChanges, MaintenanceStatus, MaintenanceType, NewMaintenance,
};
pub use repository::MaintenanceRepository;
