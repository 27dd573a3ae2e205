//! Maintenance entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub car_id: i32,

    /// routine, repair, accident, upgrade
    pub maintenance_type: String,

    /// scheduled, in_progress, completed, cancelled
    pub status: String,

    pub maintenance_date: DateTimeUtc,
    pub description: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost: Decimal,

    #[sea_orm(nullable)]
    pub completed_date: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,

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
