//! Create cars table
//!
//! The availability flag is indexed for the "available cars" lookups;
//! license plates are unique across the whole fleet, retired cars included.

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_locations::Locations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::CarModel).string_len(100).not_null())
                    .col(ColumnDef::new(Cars::CarManufacturer).string_len(100).not_null())
                    .col(ColumnDef::new(Cars::Year).integer().not_null())
                    .col(ColumnDef::new(Cars::Color).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Cars::CarType)
                            .string_len(20)
                            .not_null()
                            .default("Sedan"),
                    )
                    .col(
                        ColumnDef::new(Cars::FuelType)
                            .string_len(20)
                            .not_null()
                            .default("Petrol"),
                    )
                    .col(ColumnDef::new(Cars::RentalRate).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Cars::Availability)
                            .string_len(20)
                            .not_null()
                            .default("Available"),
                    )
                    .col(ColumnDef::new(Cars::CurrentLocationId).integer())
                    .col(
                        ColumnDef::new(Cars::LicensePlate)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Cars::Mileage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Cars::Transmission).string_len(20))
                    .col(ColumnDef::new(Cars::Seats).integer())
                    .col(ColumnDef::new(Cars::Doors).integer())
                    .col(ColumnDef::new(Cars::Description).text())
                    .col(
                        ColumnDef::new(Cars::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_location")
                            .from(Cars::Table, Cars::CurrentLocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_availability")
                    .table(Cars::Table)
                    .col(Cars::Availability)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_license_plate")
                    .table(Cars::Table)
                    .col(Cars::LicensePlate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_car_type")
                    .table(Cars::Table)
                    .col(Cars::CarType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    CarModel,
    CarManufacturer,
    Year,
    Color,
    CarType,
    FuelType,
    RentalRate,
    Availability,
    CurrentLocationId,
    LicensePlate,
    Mileage,
    Transmission,
    Seats,
    Doors,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
