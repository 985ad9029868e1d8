//! Tariff repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewTariff, Tariff, TariffFilter};
use crate::domain::shipping::TransportMode;
use crate::domain::DomainResult;

#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>>;

    /// The tariff whose window contains `as_of`, if any
    async fn find_valid_at(
        &self,
        origin: &str,
        mode: TransportMode,
        as_of: DateTime<Utc>,
    ) -> DomainResult<Option<Tariff>>;

    async fn find_open(&self, origin: &str, mode: TransportMode) -> DomainResult<Option<Tariff>>;

    /// All versions for a key, newest first
    async fn history(&self, origin: &str, mode: TransportMode) -> DomainResult<Vec<Tariff>>;

    async fn list(&self, filter: TariffFilter) -> DomainResult<Vec<Tariff>>;

    /// Close the open tariff for the key at `new.effective_from` and insert
    /// `new` as the open one, atomically.
    ///
    /// Fails with `Validation` when `effective_from` is not after the open
    /// tariff's start or after the last quotation priced with it, and with
    /// `Conflict` when a concurrent writer won.
    async fn supersede(&self, new: NewTariff) -> DomainResult<Tariff>;
}
