//! Maintenance API handlers. Staff only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CompleteMaintenanceRequest, CreateMaintenanceRequest, ListMaintenanceQuery, MaintenanceDto,
    UpdateMaintenanceRequest,
};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Maintenance scheduled", body = ApiResponse<MaintenanceDto>),
        (status = 400, description = "Non-positive cost or routine work in the past"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car already has maintenance that day")
    )
)]
pub async fn schedule_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceDto>>), ApiError> {
    let record = state
        .maintenance
        .schedule(request.into_domain()?, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(ListMaintenanceQuery),
    responses((status = 200, description = "Maintenance records, latest first", body = ApiResponse<Vec<MaintenanceDto>>))
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListMaintenanceQuery>,
) -> ApiResult<Vec<MaintenanceDto>> {
    let items = state
        .maintenance
        .list(query.car_id, &principal)
        .await?
        .into_iter()
        .map(MaintenanceDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Car ID")),
    responses((status = 200, description = "Maintenance history of the car", body = ApiResponse<Vec<MaintenanceDto>>))
)]
pub async fn list_car_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<MaintenanceDto>> {
    let items = state
        .maintenance
        .list(Some(id), &principal)
        .await?
        .into_iter()
        .map(MaintenanceDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/maintenance/{id}",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance record", body = ApiResponse<MaintenanceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<MaintenanceDto> {
    let record = state.maintenance.get(id, &principal).await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/maintenance/{id}",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = UpdateMaintenanceRequest,
    responses(
        (status = 200, description = "Maintenance updated", body = ApiResponse<MaintenanceDto>),
        (status = 400, description = "Record is completed or cancelled"),
        (status = 409, description = "New date clashes with another record")
    )
)]
pub async fn update_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateMaintenanceRequest>,
) -> ApiResult<MaintenanceDto> {
    let record = state
        .maintenance
        .update(id, request.into_domain()?, &principal)
        .await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/start",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Work started, car out of service", body = ApiResponse<MaintenanceDto>),
        (status = 400, description = "Not scheduled"),
        (status = 409, description = "Car is reserved or rented")
    )
)]
pub async fn start_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<MaintenanceDto> {
    let record = state.maintenance.start(id, &principal).await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/complete",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = CompleteMaintenanceRequest,
    responses(
        (status = 200, description = "Work finished", body = ApiResponse<MaintenanceDto>),
        (status = 400, description = "Not in progress")
    )
)]
pub async fn complete_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CompleteMaintenanceRequest>,
) -> ApiResult<MaintenanceDto> {
    let record = state
        .maintenance
        .complete(id, request.actual_cost, request.notes, &principal)
        .await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/cancel",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance cancelled", body = ApiResponse<MaintenanceDto>),
        (status = 400, description = "Already completed or cancelled")
    )
)]
pub async fn cancel_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<MaintenanceDto> {
    let record = state.maintenance.cancel(id, &principal).await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/maintenance/{id}",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance deleted"),
        (status = 400, description = "Work in progress"),
        (status = 403, description = "Managers and admins only")
    )
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.maintenance.remove(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
