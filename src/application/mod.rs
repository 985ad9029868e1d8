//! Application layer - use-case orchestration over domain repositories

pub mod identity;
pub mod services;

pub use identity::{AuthResult, UserService};
pub use services::{
    AuditService, DashboardStats, LocationService, OriginSpec, QuotationPreview,
    QuotationRequest, QuotationService, Shipment, TariffCatalogService,
};

use crate::domain::UserRole;

/// The authenticated caller of a use-case
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
