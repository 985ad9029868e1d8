//! Database entities module

pub mod audit_log;
pub mod origin_location;
pub mod quotation;
pub mod quotation_item;
pub mod tariff;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use origin_location::Entity as OriginLocation;
pub use quotation::Entity as Quotation;
pub use quotation_item::Entity as QuotationItem;
pub use tariff::Entity as Tariff;
pub use user::Entity as User;
