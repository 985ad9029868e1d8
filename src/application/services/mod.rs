//! Freight use-cases

pub mod audit;
pub mod locations;
pub mod quotation;
pub mod tariff_catalog;

pub use audit::AuditService;
pub use locations::{LocationService, OriginSpec};
pub use quotation::{DashboardStats, QuotationPreview, QuotationRequest, QuotationService, Shipment};
pub use tariff_catalog::{CreateTariffInput, TariffCatalogService};

#[cfg(test)]
pub(crate) mod test_support;
