//! Create origin_locations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OriginLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OriginLocations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OriginLocations::Code)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OriginLocations::Name).string().not_null())
                    .col(ColumnDef::new(OriginLocations::Country).string().not_null())
                    .col(ColumnDef::new(OriginLocations::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(OriginLocations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(OriginLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_origin_locations_country_kind")
                    .table(OriginLocations::Table)
                    .col(OriginLocations::Country)
                    .col(OriginLocations::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OriginLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum OriginLocations {
    Table,
    Id,
    Code,
    Name,
    Country,
    Kind,
    IsActive,
    CreatedAt,
}
