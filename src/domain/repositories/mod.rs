//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::audit::AuditRepository;
use super::location::LocationRepository;
use super::quotation::QuotationRepository;
use super::tariff::TariffRepository;
use super::user::UserRepositoryInterface;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn quote(repos: &dyn RepositoryProvider) {
///     let tariff = repos.tariffs().find_valid_at("BOG", TransportMode::Air, Utc::now()).await?;
///     let stored = repos.quotations().create(new_quotation).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tariffs(&self) -> &dyn TariffRepository;
    fn quotations(&self) -> &dyn QuotationRepository;
    fn locations(&self) -> &dyn LocationRepository;
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn audit(&self) -> &dyn AuditRepository;
}
