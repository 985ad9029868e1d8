//! Quotation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateQuotationRequest, QuotationDto, QuotationListParams, QuotationPreviewDto};
use crate::application::QuotationService;
use crate::domain::quotation::QuotationFilter;
use crate::interfaces::http::common::{
    api_error, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct QuotationHandlerState {
    pub quotations: Arc<QuotationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/quotations",
    tag = "Quotations",
    security(("bearer_auth" = [])),
    request_body = CreateQuotationRequest,
    responses(
        (status = 201, description = "Quotation stored", body = ApiResponse<QuotationDto>),
        (status = 400, description = "Invalid shipment"),
        (status = 422, description = "No tariff configured for this origin")
    )
)]
pub async fn create_quotation(
    State(state): State<QuotationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuotationDto>>), ApiError> {
    let request = request.try_into().map_err(api_error)?;
    let quotation = state
        .quotations
        .create_quotation(&user.actor(), request)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(quotation.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quotations/preview",
    tag = "Quotations",
    security(("bearer_auth" = [])),
    request_body = CreateQuotationRequest,
    responses(
        (status = 200, description = "Priced without storing", body = ApiResponse<QuotationPreviewDto>),
        (status = 422, description = "No tariff configured for this origin")
    )
)]
pub async fn preview_quotation(
    State(state): State<QuotationHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateQuotationRequest>,
) -> Result<Json<ApiResponse<QuotationPreviewDto>>, ApiError> {
    let request = request.try_into().map_err(api_error)?;
    let preview = state.quotations.preview(request).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(preview.into())))
}

/// The caller's own quotations, newest first
#[utoipa::path(
    get,
    path = "/api/v1/quotations",
    tag = "Quotations",
    security(("bearer_auth" = [])),
    params(QuotationListParams),
    responses(
        (status = 200, description = "Own history", body = ApiResponse<PaginatedResponse<QuotationDto>>)
    )
)]
pub async fn list_my_quotations(
    State(state): State<QuotationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<QuotationListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<QuotationDto>>>, ApiError> {
    let filter: QuotationFilter = params.try_into().map_err(api_error)?;
    let filter = QuotationFilter {
        owner_id: Some(user.user_id.clone()),
        ..filter
    };
    let page = state
        .quotations
        .list_quotations(&user.actor(), filter)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(page))))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}",
    tag = "Quotations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Quotation ID")),
    responses(
        (status = 200, description = "Quotation with its pieces", body = ApiResponse<QuotationDto>),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn get_quotation(
    State(state): State<QuotationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<QuotationDto>>, ApiError> {
    let quotation = state
        .quotations
        .get_quotation(&user.actor(), id)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(quotation.into())))
}
