use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateLocationRequest, ListLocationsParams, LocationDto};
use crate::application::LocationService;
use crate::domain::LocationKind;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct LocationHandlerState {
    pub locations: Arc<LocationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    security(("bearer_auth" = [])),
    params(ListLocationsParams),
    responses(
        (status = 200, description = "Active locations", body = ApiResponse<Vec<LocationDto>>)
    )
)]
pub async fn list_locations(
    State(state): State<LocationHandlerState>,
    Query(params): Query<ListLocationsParams>,
) -> Result<Json<ApiResponse<Vec<LocationDto>>>, ApiError> {
    let kind = params
        .kind
        .as_deref()
        .map(str::parse::<LocationKind>)
        .transpose()
        .map_err(api_error)?;
    let locations = state
        .locations
        .list_locations(kind, params.country.as_deref())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        locations.into_iter().map(LocationDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    tag = "Locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<LocationDto>),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn create_location(
    State(state): State<LocationHandlerState>,
    Extension(admin): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LocationDto>>), ApiError> {
    let location = request.try_into().map_err(api_error)?;
    let created = state
        .locations
        .create_location(&admin.actor(), location)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}
