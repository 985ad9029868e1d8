//! Create quotation_items table

use sea_orm_migration::prelude::*;

use super::m20240601_000004_create_quotations::Quotations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuotationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuotationItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuotationItems::QuotationId).integer().not_null())
                    .col(ColumnDef::new(QuotationItems::Position).integer().not_null())
                    .col(ColumnDef::new(QuotationItems::WeightKg).decimal_len(14, 3).not_null())
                    .col(ColumnDef::new(QuotationItems::LengthCm).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(QuotationItems::WidthCm).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(QuotationItems::HeightCm).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(QuotationItems::VolumeM3).decimal_len(14, 6).not_null())
                    .col(
                        ColumnDef::new(QuotationItems::VolumetricWeightKg)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotation_items_quotation")
                            .from(QuotationItems::Table, QuotationItems::QuotationId)
                            .to(Quotations::Table, Quotations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuotationItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum QuotationItems {
    Table,
    Id,
    QuotationId,
    Position,
    WeightKg,
    LengthCm,
    WidthCm,
    HeightCm,
    VolumeM3,
    VolumetricWeightKg,
}
