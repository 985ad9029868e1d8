//! Admin handlers. Routed behind the admin gate.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use super::dto::{AuditEntryDto, AuditLogParams, DashboardDto};
use crate::application::{AuditService, QuotationService};
use crate::domain::quotation::QuotationFilter;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::quotations::{QuotationDto, QuotationListParams};

#[derive(Clone)]
pub struct AdminHandlerState {
    pub quotations: Arc<QuotationService>,
    pub audit: Arc<AuditService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/quotations",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(QuotationListParams),
    responses(
        (status = 200, description = "Every user's quotations", body = ApiResponse<PaginatedResponse<QuotationDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_all_quotations(
    State(state): State<AdminHandlerState>,
    Extension(admin): Extension<AuthenticatedUser>,
    Query(params): Query<QuotationListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<QuotationDto>>>, ApiError> {
    let filter = params.try_into().map_err(api_error)?;
    let page = state
        .quotations
        .list_quotations(&admin.actor(), filter)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(page))))
}

/// Same filters as the history listing, without pagination
#[utoipa::path(
    get,
    path = "/api/v1/admin/quotations/export",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(QuotationListParams),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn export_quotations(
    State(state): State<AdminHandlerState>,
    Query(params): Query<QuotationListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter: QuotationFilter = params.try_into().map_err(api_error)?;
    let csv = state.quotations.export_csv(filter).await.map_err(api_error)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"quotations.csv\"",
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Headline counts", body = ApiResponse<DashboardDto>)
    )
)]
pub async fn dashboard(
    State(state): State<AdminHandlerState>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let stats = state.quotations.dashboard().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/audit-log",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AuditLogParams),
    responses(
        (status = 200, description = "Admin actions, newest first", body = ApiResponse<PaginatedResponse<AuditEntryDto>>)
    )
)]
pub async fn audit_log(
    State(state): State<AdminHandlerState>,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<AuditEntryDto>>>, ApiError> {
    let page = state.audit.list(params.into()).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(page))))
}
