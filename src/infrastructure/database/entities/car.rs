//! Car entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub car_model: String,
    pub car_manufacturer: String,
    pub year: i32,
    pub color: String,

    /// Sedan, SUV, Hatchback, Coupe, Convertible, Minivan, Truck, Luxury
    pub car_type: String,

    /// Petrol, Diesel, Electric, Hybrid
    pub fuel_type: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub rental_rate: Decimal,

    /// Available, Reserved, Rented, Maintenance
    pub availability: String,

    #[sea_orm(nullable)]
    pub current_location_id: Option<i32>,

    #[sea_orm(unique)]
    pub license_plate: String,

    pub mileage: i32,

    #[sea_orm(nullable)]
    pub transmission: Option<String>,
    #[sea_orm(nullable)]
    pub seats: Option<i32>,
    #[sea_orm(nullable)]
    pub doors: Option<i32>,
    #[sea_orm(nullable)]
    pub description: Option<String>,

    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::CurrentLocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::rental::Entity")]
    Rentals,
    #[sea_orm(has_many = "super::maintenance::Entity")]
    Maintenances,
    #[sea_orm(has_many = "super::insurance::Entity")]
    Insurances,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::rental::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl Related<super::maintenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Maintenances.def()
    }
}

impl Related<super::insurance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Insurances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
