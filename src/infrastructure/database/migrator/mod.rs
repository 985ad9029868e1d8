//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users;
mod m20240601_000002_create_origin_locations;
mod m20240601_000003_create_tariffs;
mod m20240601_000004_create_quotations;
mod m20240601_000005_create_quotation_items;
mod m20240601_000006_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_origin_locations::Migration),
            Box::new(m20240601_000003_create_tariffs::Migration),
            Box::new(m20240601_000004_create_quotations::Migration),
            Box::new(m20240601_000005_create_quotation_items::Migration),
            Box::new(m20240601_000006_create_audit_logs::Migration),
        ]
    }
}
