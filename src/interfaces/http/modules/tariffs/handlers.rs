//! Tariff handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateTariffRequest, CurrentTariffParams, ListTariffsParams, TariffHistoryParams,
    TariffResponse,
};
use crate::application::{LocationService, TariffCatalogService};
use crate::interfaces::http::common::{
    api_error, origin_spec, parse_mode, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct TariffHandlerState {
    pub catalog: Arc<TariffCatalogService>,
    pub locations: Arc<LocationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    security(("bearer_auth" = [])),
    params(ListTariffsParams),
    responses(
        (status = 200, description = "Tariff list", body = ApiResponse<Vec<TariffResponse>>)
    )
)]
pub async fn list_tariffs(
    State(state): State<TariffHandlerState>,
    Query(params): Query<ListTariffsParams>,
) -> Result<Json<ApiResponse<Vec<TariffResponse>>>, ApiError> {
    let filter = params.try_into().map_err(api_error)?;
    let tariffs = state.catalog.list_tariffs(filter).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        tariffs.into_iter().map(TariffResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tariffs/current",
    tag = "Tariffs",
    security(("bearer_auth" = [])),
    params(CurrentTariffParams),
    responses(
        (status = 200, description = "Tariff valid at the requested instant", body = ApiResponse<TariffResponse>),
        (status = 422, description = "No tariff configured for this origin")
    )
)]
pub async fn get_current_tariff(
    State(state): State<TariffHandlerState>,
    Query(params): Query<CurrentTariffParams>,
) -> Result<Json<ApiResponse<TariffResponse>>, ApiError> {
    let mode = parse_mode(&params.mode).map_err(api_error)?;
    let spec = origin_spec(params.origin, params.origin_country).map_err(api_error)?;
    let origin = state
        .locations
        .resolve_origin(&spec, mode, false)
        .await
        .map_err(api_error)?;

    let tariff = state
        .catalog
        .resolve(&origin, mode, params.as_of)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(tariff.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tariffs/history",
    tag = "Tariffs",
    security(("bearer_auth" = [])),
    params(TariffHistoryParams),
    responses(
        (status = 200, description = "All versions for the key, newest first", body = ApiResponse<Vec<TariffResponse>>)
    )
)]
pub async fn get_tariff_history(
    State(state): State<TariffHandlerState>,
    Query(params): Query<TariffHistoryParams>,
) -> Result<Json<ApiResponse<Vec<TariffResponse>>>, ApiError> {
    let mode = parse_mode(&params.mode).map_err(api_error)?;
    let origin = params.origin.trim().to_uppercase();
    let history = state
        .catalog
        .tariff_history(&origin, mode)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        history.into_iter().map(TariffResponse::from).collect(),
    )))
}

/// Publish a new tariff version; the current one for the key is closed at
/// `effective_from`.
#[utoipa::path(
    post,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    security(("bearer_auth" = [])),
    request_body = CreateTariffRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<TariffResponse>),
        (status = 400, description = "Invalid rate, origin or start"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Concurrent publication for the same key, retry")
    )
)]
pub async fn create_tariff(
    State(state): State<TariffHandlerState>,
    Extension(admin): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateTariffRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TariffResponse>>), ApiError> {
    let input = request.try_into().map_err(api_error)?;
    let tariff = state
        .catalog
        .create_tariff(&admin.actor(), input)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tariff.into()))))
}
