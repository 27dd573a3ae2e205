//! Create insurances table

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
                    .table(Insurances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Insurances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Insurances::CarId).integer().not_null())
                    .col(
                        ColumnDef::new(Insurances::InsuranceProvider)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insurances::PolicyNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Insurances::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insurances::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insurances::PremiumAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insurances::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Insurances::CoverageDetails).text())
                    .col(
                        ColumnDef::new(Insurances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insurances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insurances_car")
                            .from(Insurances::Table, Insurances::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_insurances_car")
                    .table(Insurances::Table)
                    .col(Insurances::CarId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Insurances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Insurances {
    Table,
    Id,
    CarId,
    InsuranceProvider,
    PolicyNumber,
    StartDate,
    EndDate,
    PremiumAmount,
    Status,
    CoverageDetails,
    CreatedAt,
    UpdatedAt,
}
