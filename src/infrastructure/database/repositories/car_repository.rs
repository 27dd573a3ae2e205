//! SeaORM implementation of CarRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::domain::car::{Car, CarAvailability, CarRepository, CarType, FuelType, NewCar};
use crate::domain::pricing::round_money;
use crate::infrastructure::database::entities::car;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmCarRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmCarRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: car::Model) -> DomainResult<Car> {
    let corrupt = |field: &str, value: &str| {
        DomainError::Internal(format!("car {} has unknown {} '{}'", m.id, field, value))
    };
    Ok(Car {
        id: m.id,
        car_type: CarType::from_str(&m.car_type).ok_or_else(|| corrupt("car_type", &m.car_type))?,
        fuel_type: FuelType::from_str(&m.fuel_type)
            .ok_or_else(|| corrupt("fuel_type", &m.fuel_type))?,
        availability: CarAvailability::from_str(&m.availability)
            .ok_or_else(|| corrupt("availability", &m.availability))?,
        model: m.car_model,
        manufacturer: m.car_manufacturer,
        year: m.year,
        color: m.color,
        rental_rate: round_money(m.rental_rate),
        current_location_id: m.current_location_id,
        license_plate: m.license_plate,
        mileage: m.mileage,
        transmission: m.transmission,
        seats: m.seats,
        doors: m.doors,
        description: m.description,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(c: &Car) -> car::ActiveModel {
    car::ActiveModel {
        id: Set(c.id),
        car_model: Set(c.model.clone()),
        car_manufacturer: Set(c.manufacturer.clone()),
        year: Set(c.year),
        color: Set(c.color.clone()),
        car_type: Set(c.car_type.as_str().to_string()),
        fuel_type: Set(c.fuel_type.as_str().to_string()),
        rental_rate: Set(c.rental_rate),
        availability: Set(c.availability.as_str().to_string()),
        current_location_id: Set(c.current_location_id),
        license_plate: Set(c.license_plate.clone()),
        mileage: Set(c.mileage),
        transmission: Set(c.transmission.clone()),
        seats: Set(c.seats),
        doors: Set(c.doors),
        description: Set(c.description.clone()),
        is_active: Set(c.is_active),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

// ── CarRepository impl ──────────────────────────────────────────

#[async_trait]
impl<C> CarRepository for SeaOrmCarRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewCar, now: DateTime<Utc>) -> DomainResult<Car> {
        debug!("Inserting car: {}", new.license_plate);

        let model = car::ActiveModel {
            car_model: Set(new.model),
            car_manufacturer: Set(new.manufacturer),
            year: Set(new.year),
            color: Set(new.color),
            car_type: Set(new.car_type.as_str().to_string()),
            fuel_type: Set(new.fuel_type.as_str().to_string()),
            rental_rate: Set(round_money(new.rental_rate)),
            availability: Set(CarAvailability::Available.as_str().to_string()),
            current_location_id: Set(new.current_location_id),
            license_plate: Set(new.license_plate),
            mileage: Set(new.mileage),
            transmission: Set(new.transmission),
            seats: Set(new.seats),
            doors: Set(new.doors),
            description: Set(new.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Car>> {
        car::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_id_for_update(&self, id: i32) -> DomainResult<Option<Car>> {
        car::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>> {
        car::Entity::find()
            .filter(car::Column::LicensePlate.eq(plate))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_active(&self, availability: Option<CarAvailability>) -> DomainResult<Vec<Car>> {
        let mut query = car::Entity::find().filter(car::Column::IsActive.eq(true));
        if let Some(state) = availability {
            query = query.filter(car::Column::Availability.eq(state.as_str()));
        }
        let models = query
            .order_by_asc(car::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(&self, c: &Car) -> DomainResult<()> {
        debug!("Updating car {}: availability={}", c.id, c.availability);
        domain_to_active(c)
            .update(self.conn.as_ref())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Car", c.id),
                other => db_err(other),
            })?;
        Ok(())
    }
}
