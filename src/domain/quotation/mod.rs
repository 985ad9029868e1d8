//! Quotation aggregate
//!
//! A priced shipment request. Immutable once stored.

pub mod model;
pub mod repository;

pub use model::{NewQuotation, Quotation, QuotationFilter, QuotationItem};
pub use repository::QuotationRepository;
