use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No tariff is valid for the key at the requested instant
    #[error("no tariff configured for this origin ({origin}, {mode})")]
    NoActiveTariff { origin: String, mode: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_tariff_message_names_origin() {
        let err = DomainError::NoActiveTariff {
            origin: "BOG".into(),
            mode: "air".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("no tariff configured for this origin"));
        assert!(msg.contains("BOG"));
    }

    #[test]
    fn infra_error_wraps_db_err() {
        let err: AppError = InfraError::from(sea_orm::DbErr::Custom("boom".into())).into();
        assert!(err.to_string().contains("boom"));
    }
}
