//! Create tariffs table
//!
//! At most one open tariff (`valid_until IS NULL`) per (origin, mode) is
//! enforced by a partial unique index. Both SQLite and PostgreSQL accept
//! the same statement.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tariffs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tariffs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tariffs::Origin).string_len(32).not_null())
                    .col(ColumnDef::new(Tariffs::Mode).string_len(10).not_null())
                    .col(ColumnDef::new(Tariffs::RateUsd).decimal_len(14, 4).not_null())
                    .col(
                        ColumnDef::new(Tariffs::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tariffs::ValidUntil).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tariffs::CreatedBy).string())
                    .col(
                        ColumnDef::new(Tariffs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tariffs_key_valid_from")
                    .table(Tariffs::Table)
                    .col(Tariffs::Origin)
                    .col(Tariffs::Mode)
                    .col(Tariffs::ValidFrom)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_tariffs_open_per_key \
                 ON tariffs (origin, mode) WHERE valid_until IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tariffs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tariffs {
    Table,
    Id,
    Origin,
    Mode,
    RateUsd,
    ValidFrom,
    ValidUntil,
    CreatedBy,
    CreatedAt,
}
