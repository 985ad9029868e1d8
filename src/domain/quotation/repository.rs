use async_trait::async_trait;

use super::model::{NewQuotation, Quotation, QuotationFilter};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait QuotationRepository: Send + Sync {
    /// Insert the quotation and its items in one transaction
    async fn create(&self, quotation: NewQuotation) -> DomainResult<Quotation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Quotation>>;

    /// Newest first
    async fn list(&self, filter: QuotationFilter) -> DomainResult<PaginatedResult<Quotation>>;

    /// Every row matching the filter, ignoring pagination (CSV export)
    async fn list_all(&self, filter: QuotationFilter) -> DomainResult<Vec<Quotation>>;

    async fn count(&self) -> DomainResult<u64>;
}
