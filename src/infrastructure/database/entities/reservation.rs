//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub car_id: i32,
    pub customer_id: i32,

    pub reservation_date: DateTimeUtc,
    pub pickup_date: DateTimeUtc,
    pub return_date: DateTimeUtc,

    #[sea_orm(nullable)]
    pub pickup_location_id: Option<i32>,
    #[sea_orm(nullable)]
    pub return_location_id: Option<i32>,

    /// pending, confirmed, cancelled, completed
    pub status: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub advance_payment: Option<Decimal>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
