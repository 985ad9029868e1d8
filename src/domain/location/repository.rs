use async_trait::async_trait;

use super::model::{LocationFilter, NewLocation, OriginLocation};
use crate::domain::DomainResult;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<OriginLocation>>;

    /// First active location of `kind` in `country`, ordered by name then code
    async fn find_first_in_country(
        &self,
        country: &str,
        kind: super::LocationKind,
    ) -> DomainResult<Option<OriginLocation>>;

    async fn list(&self, filter: LocationFilter) -> DomainResult<Vec<OriginLocation>>;

    /// Fails with `Conflict` when the code is taken
    async fn create(&self, location: NewLocation) -> DomainResult<OriginLocation>;

    /// Insert unless a location with the same code exists; returns the stored row
    async fn get_or_create(&self, location: NewLocation) -> DomainResult<OriginLocation>;

    async fn count_active(&self, kind: super::LocationKind) -> DomainResult<u64>;
}
