//! Create quotations table

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_users::Users;
use super::m20240601_000003_create_tariffs::Tariffs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quotations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quotations::OwnerId).string().not_null())
                    .col(ColumnDef::new(Quotations::Origin).string_len(32).not_null())
                    .col(ColumnDef::new(Quotations::Destination).string().not_null())
                    .col(ColumnDef::new(Quotations::Mode).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Quotations::PiecesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Quotations::WeightKg).decimal_len(14, 3).not_null())
                    .col(ColumnDef::new(Quotations::VolumeM3).decimal_len(14, 6).not_null())
                    .col(
                        ColumnDef::new(Quotations::VolumetricWeightKg)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quotations::TariffId).integer().not_null())
                    .col(ColumnDef::new(Quotations::RateUsd).decimal_len(14, 4).not_null())
                    .col(
                        ColumnDef::new(Quotations::ChargeableBasis)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotations::ChargeableValue)
                            .decimal_len(14, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quotations::AmountUsd).decimal_len(14, 2).not_null())
                    .col(
                        ColumnDef::new(Quotations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotations_owner")
                            .from(Quotations::Table, Quotations::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotations_tariff")
                            .from(Quotations::Table, Quotations::TariffId)
                            .to(Tariffs::Table, Tariffs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotations_owner_created")
                    .table(Quotations::Table)
                    .col(Quotations::OwnerId)
                    .col(Quotations::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Quotations {
    Table,
    Id,
    OwnerId,
    Origin,
    Destination,
    Mode,
    PiecesCount,
    WeightKg,
    VolumeM3,
    VolumetricWeightKg,
    TariffId,
    RateUsd,
    ChargeableBasis,
    ChargeableValue,
    AmountUsd,
    CreatedAt,
}
