use async_trait::async_trait;

use super::model::{AuditEntry, AuditFilter, NewAuditEntry};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry>;

    /// Newest first
    async fn list(&self, filter: AuditFilter) -> DomainResult<PaginatedResult<AuditEntry>>;
}
