//! Shared fixtures: migrated in-memory SQLite, a fixed clock and a few
//! ready-made principals.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use car_rental::application::{IdentityService, ServiceContext};
use car_rental::domain::car::{Car, CarType, FuelType, NewCar};
use car_rental::domain::customer::{Customer, NewCustomer};
use car_rental::domain::reservation::{NewReservation, Reservation};
use car_rental::domain::{PricingPolicy, Principal, RepositoryProvider, UserRole};
use car_rental::infrastructure::crypto::jwt::JwtConfig;
use car_rental::infrastructure::database::migrator::Migrator;
use car_rental::infrastructure::database::PoolConfig;
use car_rental::interfaces::http::AppState;
use car_rental::shared::FixedClock;
use car_rental::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: Arc<FixedClock>,
    pub state: AppState,
}

/// Monday 2025-01-06 09:00 UTC
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: JWT_SECRET.to_string(),
        ..JwtConfig::default()
    }
}

pub async fn setup() -> TestApp {
    setup_with(&DatabaseConfig::in_memory()).await
}

pub async fn setup_with(config: &DatabaseConfig) -> TestApp {
    let db = init_database(config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock = Arc::new(FixedClock::new(t0()));
    let ctx = ServiceContext::new(repos.clone(), clock.clone(), StdDuration::from_secs(5));
    let identity = IdentityService::new(ctx.clone(), jwt_config()).with_password_cost(4);
    let state = AppState::with_identity(ctx, PricingPolicy::default(), identity);

    TestApp {
        db,
        repos,
        clock,
        state,
    }
}

/// SQLite file under the temp dir, removed (with its journal files) on drop.
pub struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("car-rental-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    /// Pool of `connections` over the file, so transactions really interleave.
    pub fn config(&self, connections: u32) -> DatabaseConfig {
        DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", self.path.display()),
            pool: PoolConfig {
                max_connections: connections,
                min_connections: 1,
                ..PoolConfig::default()
            },
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

pub fn admin() -> Principal {
    Principal::new(1, UserRole::Admin, None)
}

pub fn employee() -> Principal {
    Principal::new(2, UserRole::Employee, None)
}

pub fn customer_principal(customer_id: i32) -> Principal {
    Principal::new(100 + customer_id, UserRole::Customer, Some(customer_id))
}

pub fn new_car(plate: &str, daily_rate: i64) -> NewCar {
    NewCar {
        model: "Corolla".to_string(),
        manufacturer: "Toyota".to_string(),
        year: 2022,
        color: "White".to_string(),
        car_type: CarType::Sedan,
        fuel_type: FuelType::Petrol,
        rental_rate: Decimal::from(daily_rate),
        current_location_id: None,
        license_plate: plate.to_string(),
        mileage: 12_000,
        transmission: Some("automatic".to_string()),
        seats: Some(5),
        doors: Some(4),
        description: None,
    }
}

pub fn new_customer(first_name: &str, driver_license: Option<&str>) -> NewCustomer {
    NewCustomer {
        first_name: first_name.to_string(),
        last_name: "Otieno".to_string(),
        phone_number: "+254700000000".to_string(),
        address: "Moi Avenue 1, Nairobi".to_string(),
        driver_license: driver_license.map(str::to_string),
    }
}

impl TestApp {
    pub async fn car(&self, plate: &str, daily_rate: i64) -> Car {
        self.state
            .cars
            .create(new_car(plate, daily_rate), &admin())
            .await
            .unwrap()
    }

    pub async fn customer(&self, first_name: &str) -> Customer {
        self.state
            .customers
            .create(new_customer(first_name, Some("DL-1234567")), &employee())
            .await
            .unwrap()
    }

    pub async fn reload_car(&self, car_id: i32) -> Car {
        self.state.cars.get(car_id).await.unwrap()
    }

    /// Pending reservation for `[start, start + days]` made by the customer.
    pub async fn reserve(
        &self,
        car_id: i32,
        customer_id: i32,
        start: DateTime<Utc>,
        days: i64,
    ) -> car_rental::domain::DomainResult<Reservation> {
        self.state
            .reservations
            .create(
                NewReservation {
                    car_id,
                    customer_id,
                    pickup_date: start,
                    return_date: start + Duration::days(days),
                    pickup_location_id: None,
                    return_location_id: None,
                    advance_payment: None,
                },
                &customer_principal(customer_id),
            )
            .await
    }
}
