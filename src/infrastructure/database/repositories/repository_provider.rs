//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::audit::AuditRepository;
use crate::domain::location::LocationRepository;
use crate::domain::quotation::QuotationRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::TariffRepository;
use crate::domain::user::UserRepositoryInterface;

use super::audit_repository::SeaOrmAuditRepository;
use super::location_repository::SeaOrmLocationRepository;
use super::quotation_repository::SeaOrmQuotationRepository;
use super::tariff_repository::SeaOrmTariffRepository;
use super::user_repository::UserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let open = repos.tariffs().find_open("BOG", TransportMode::Air).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    tariffs: SeaOrmTariffRepository,
    quotations: SeaOrmQuotationRepository,
    locations: SeaOrmLocationRepository,
    users: UserRepository,
    audit: SeaOrmAuditRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tariffs: SeaOrmTariffRepository::new(db.clone()),
            quotations: SeaOrmQuotationRepository::new(db.clone()),
            locations: SeaOrmLocationRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            audit: SeaOrmAuditRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }

    fn quotations(&self) -> &dyn QuotationRepository {
        &self.quotations
    }

    fn locations(&self) -> &dyn LocationRepository {
        &self.locations
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn audit(&self) -> &dyn AuditRepository {
        &self.audit
    }
}
