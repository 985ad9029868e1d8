pub mod audit;
pub mod charge;
pub mod location;
pub mod quotation;
pub mod repositories;
pub mod shipping;
pub mod tariff;
pub mod user;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry, NewAuditEntry};
pub use charge::{ChargeBasis, ChargeBreakdown};
pub use location::{EntryPoint, LocationKind, OriginLocation};
pub use quotation::{NewQuotation, Quotation, QuotationItem};
pub use repositories::{DomainResult, RepositoryProvider};
pub use shipping::TransportMode;
pub use tariff::{NewTariff, Tariff};
pub use user::{User, UserRole};

pub use crate::shared::errors::DomainError;
