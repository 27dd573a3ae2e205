//! Location API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateLocationRequest, LocationDto, UpdateLocationRequest};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    responses((status = 200, description = "Active locations", body = ApiResponse<Vec<LocationDto>>))
)]
pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Vec<LocationDto>> {
    let items = state
        .locations
        .list()
        .await?
        .into_iter()
        .map(LocationDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location details", body = ApiResponse<LocationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<LocationDto> {
    let location = state.locations.get(id).await?;
    Ok(Json(ApiResponse::success(location.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    tag = "Locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = ApiResponse<LocationDto>),
        (status = 400, description = "Opening time not before closing time"),
        (status = 403, description = "Managers and admins only")
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LocationDto>>), ApiError> {
    let location = state.locations.create(request.into(), &principal).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(location.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<LocationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateLocationRequest>,
) -> ApiResult<LocationDto> {
    let location = state
        .locations
        .update(id, request.into(), &principal)
        .await?;
    Ok(Json(ApiResponse::success(location.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location deactivated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn deactivate_location(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.locations.deactivate(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
