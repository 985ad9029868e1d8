//! Domain error to HTTP status mapping

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NoActiveTariff { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn api_error(err: DomainError) -> ApiError {
    let status = status_for(&err);
    let message = match &err {
        DomainError::NoActiveTariff { .. } => "no tariff configured for this origin".to_string(),
        DomainError::Storage(detail) => {
            error!(error = %detail, "Storage failure while handling request");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant() {
        let cases = [
            (DomainError::not_found("Tariff", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status);
        }
    }

    #[test]
    fn no_active_tariff_is_unprocessable_with_fixed_message() {
        let (status, Json(body)) = api_error(DomainError::NoActiveTariff {
            origin: "BOG".into(),
            mode: "air".into(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.as_deref(), Some("no tariff configured for this origin"));
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (_, Json(body)) = api_error(DomainError::Storage("disk I/O error".into()));
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
