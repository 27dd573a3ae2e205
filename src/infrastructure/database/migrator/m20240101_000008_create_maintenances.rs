//! Create maintenances table

use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_cars::Cars;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Maintenances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Maintenances::CarId).integer().not_null())
                    .col(
                        ColumnDef::new(Maintenances::MaintenanceType)
                            .string_len(20)
                            .not_null()
                            .default("routine"),
                    )
                    .col(
                        ColumnDef::new(Maintenances::Status)
                            .string_len(20)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(Maintenances::MaintenanceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Maintenances::Description).string_len(255).not_null())
                    .col(ColumnDef::new(Maintenances::Cost).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Maintenances::CompletedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Maintenances::Notes).text())
                    .col(
                        ColumnDef::new(Maintenances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenances_car")
                            .from(Maintenances::Table, Maintenances::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenances_car_date")
                    .table(Maintenances::Table)
                    .col(Maintenances::CarId)
                    .col(Maintenances::MaintenanceDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Maintenances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Maintenances {
    Table,
    Id,
    CarId,
    MaintenanceType,
    Status,
    MaintenanceDate,
    Description,
    Cost,
    CompletedDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}
