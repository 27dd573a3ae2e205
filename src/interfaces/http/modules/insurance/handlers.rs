//! Insurance API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateInsuranceRequest, InsuranceDto, ListInsuranceQuery, RenewInsuranceRequest,
    UpdateInsuranceRequest,
};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/insurance",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    request_body = CreateInsuranceRequest,
    responses(
        (status = 201, description = "Policy created", body = ApiResponse<InsuranceDto>),
        (status = 400, description = "Start not before end, or non-positive premium"),
        (status = 403, description = "Managers and admins only"),
        (status = 409, description = "Duplicate policy number or overlapping active policy")
    )
)]
pub async fn create_insurance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateInsuranceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InsuranceDto>>), ApiError> {
    let policy = state.insurance.create(request.into(), &principal).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(policy.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/insurance",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    params(ListInsuranceQuery),
    responses((status = 200, description = "Policies, latest start first", body = ApiResponse<Vec<InsuranceDto>>))
)]
pub async fn list_insurance(
    State(state): State<AppState>,
    Query(query): Query<ListInsuranceQuery>,
) -> ApiResult<Vec<InsuranceDto>> {
    let items = state
        .insurance
        .list(query.car_id)
        .await?
        .into_iter()
        .map(InsuranceDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/insurance/active",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Policies in force right now", body = ApiResponse<Vec<InsuranceDto>>))
)]
pub async fn list_active_insurance(State(state): State<AppState>) -> ApiResult<Vec<InsuranceDto>> {
    let items = state
        .insurance
        .list_in_force()
        .await?
        .into_iter()
        .map(InsuranceDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/insurance/{id}",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Insurance ID")),
    responses(
        (status = 200, description = "Policy", body = ApiResponse<InsuranceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_insurance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<InsuranceDto> {
    let policy = state.insurance.get(id).await?;
    Ok(Json(ApiResponse::success(policy.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/insurance/{id}",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Insurance ID")),
    request_body = UpdateInsuranceRequest,
    responses(
        (status = 200, description = "Policy updated", body = ApiResponse<InsuranceDto>),
        (status = 400, description = "Policy not active, or bad period"),
        (status = 409, description = "New period overlaps another active policy")
    )
)]
pub async fn update_insurance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateInsuranceRequest>,
) -> ApiResult<InsuranceDto> {
    let policy = state.insurance.update(id, request.into(), &principal).await?;
    Ok(Json(ApiResponse::success(policy.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/insurance/{id}/renew",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Insurance ID")),
    request_body = RenewInsuranceRequest,
    responses(
        (status = 200, description = "Policy extended", body = ApiResponse<InsuranceDto>),
        (status = 400, description = "Not active, or new end not after current end"),
        (status = 409, description = "Extension overlaps another active policy")
    )
)]
pub async fn renew_insurance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RenewInsuranceRequest>,
) -> ApiResult<InsuranceDto> {
    let policy = state
        .insurance
        .renew(id, request.new_end_date, request.premium_amount, &principal)
        .await?;
    Ok(Json(ApiResponse::success(policy.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/insurance/{id}",
    tag = "Insurance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Insurance ID")),
    responses(
        (status = 200, description = "Policy deleted"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_insurance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.insurance.remove(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
