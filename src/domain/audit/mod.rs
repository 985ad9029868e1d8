//! Audit trail of administrative actions

pub mod model;
pub mod repository;

pub use model::{AuditAction, AuditEntry, AuditFilter, NewAuditEntry};
pub use repository::AuditRepository;
