use std::sync::Arc;

use crate::domain::audit::{AuditEntry, AuditFilter};
use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::PaginatedResult;

/// Read side of the audit trail. Entries are written by the services
/// performing the audited action.
pub struct AuditService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AuditService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self, filter: AuditFilter) -> DomainResult<PaginatedResult<AuditEntry>> {
        self.repos.audit().list(filter).await
    }
}
