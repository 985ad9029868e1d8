use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::DashboardStats;
use crate::domain::audit::AuditFilter;
use crate::domain::AuditEntry;
use crate::shared::validate_pagination;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub active_users: u64,
    pub admin_users: u64,
    pub quotations: u64,
    pub active_airports: u64,
    pub active_seaports: u64,
}

impl From<DashboardStats> for DashboardDto {
    fn from(s: DashboardStats) -> Self {
        Self {
            active_users: s.active_users,
            admin_users: s.admin_users,
            quotations: s.quotations,
            active_airports: s.active_airports,
            active_seaports: s.active_seaports,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryDto {
    pub id: i32,
    pub actor_id: Option<String>,
    pub action: String,
    pub model_name: String,
    pub object_id: String,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryDto {
    fn from(e: AuditEntry) -> Self {
        Self {
            id: e.id,
            actor_id: e.actor_id,
            action: e.action,
            model_name: e.model_name,
            object_id: e.object_id,
            metadata: e.metadata,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogParams {
    /// e.g. `CREATE_TARIFF`
    pub action: Option<String>,
    pub actor_id: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl From<AuditLogParams> for AuditFilter {
    fn from(params: AuditLogParams) -> Self {
        let (page, limit) = validate_pagination(params.page, params.limit);
        Self {
            action: params.action.map(|a| a.trim().to_uppercase()).filter(|a| !a.is_empty()),
            actor_id: params.actor_id.filter(|a| !a.is_empty()),
            page,
            limit,
        }
    }
}
