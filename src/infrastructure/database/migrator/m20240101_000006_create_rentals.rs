//! Create rentals table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_customers::Customers;
use super::m20240101_000003_create_locations::Locations;
use super::m20240101_000004_create_cars::Cars;
use super::m20240101_000005_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rentals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rentals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rentals::CarId).integer().not_null())
                    .col(ColumnDef::new(Rentals::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Rentals::ReservationId).integer())
                    .col(
                        ColumnDef::new(Rentals::RentalStartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rentals::RentalEndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rentals::ActualReturnDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Rentals::TotalAmount).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Rentals::LateFee)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rentals::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Rentals::PickupLocationId).integer())
                    .col(ColumnDef::new(Rentals::ReturnLocationId).integer())
                    .col(
                        ColumnDef::new(Rentals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_car")
                            .from(Rentals::Table, Rentals::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_customer")
                            .from(Rentals::Table, Rentals::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_reservation")
                            .from(Rentals::Table, Rentals::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_pickup_location")
                            .from(Rentals::Table, Rentals::PickupLocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_return_location")
                            .from(Rentals::Table, Rentals::ReturnLocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentals_car")
                    .table(Rentals::Table)
                    .col(Rentals::CarId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentals_status")
                    .table(Rentals::Table)
                    .col(Rentals::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rentals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rentals {
    Table,
    Id,
    CarId,
    CustomerId,
    ReservationId,
    RentalStartDate,
    RentalEndDate,
    ActualReturnDate,
    TotalAmount,
    LateFee,
    Status,
    PickupLocationId,
    ReturnLocationId,
    CreatedAt,
}
