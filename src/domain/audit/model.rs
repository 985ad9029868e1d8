use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateTariff,
    CreateUser,
    CreateLocation,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTariff => "CREATE_TARIFF",
            Self::CreateUser => "CREATE_USER",
            Self::CreateLocation => "CREATE_LOCATION",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i32,
    pub actor_id: Option<String>,
    pub action: String,
    pub model_name: String,
    pub object_id: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: Option<String>,
    pub action: AuditAction,
    pub model_name: &'static str,
    pub object_id: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub actor_id: Option<String>,
    pub page: u64,
    pub limit: u64,
}
