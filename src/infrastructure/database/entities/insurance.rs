//! Insurance policy entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insurances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub car_id: i32,
    pub insurance_provider: String,

    #[sea_orm(unique)]
    pub policy_number: String,

    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub premium_amount: Decimal,

    /// active, expired, cancelled
    pub status: String,

    #[sea_orm(nullable)]
    pub coverage_details: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
