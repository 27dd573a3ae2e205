//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_customers;
mod m20240101_000002_create_users;
mod m20240101_000003_create_locations;
mod m20240101_000004_create_cars;
mod m20240101_000005_create_reservations;
mod m20240101_000006_create_rentals;
mod m20240101_000007_create_payments;
mod m20240101_000008_create_maintenances;
mod m20240101_000009_create_insurances;
mod m20240101_000010_add_refunded_amount_to_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customers::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_locations::Migration),
            Box::new(m20240101_000004_create_cars::Migration),
            Box::new(m20240101_000005_create_reservations::Migration),
            Box::new(m20240101_000006_create_rentals::Migration),
            Box::new(m20240101_000007_create_payments::Migration),
            Box::new(m20240101_000008_create_maintenances::Migration),
            Box::new(m20240101_000009_create_insurances::Migration),
            Box::new(m20240101_000010_add_refunded_amount_to_payments::Migration),
        ]
    }
}
