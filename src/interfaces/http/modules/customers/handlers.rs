//! Customer API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateCustomerRequest, CustomerDto, DriverLicenseRequest, UpdateCustomerRequest};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerDto>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDto>>), ApiError> {
    let customer = state.customers.create(request.into(), &principal).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(customer.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All customers", body = ApiResponse<Vec<CustomerDto>>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<CustomerDto>> {
    let items = state
        .customers
        .list(&principal)
        .await?
        .into_iter()
        .map(CustomerDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = ApiResponse<CustomerDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<CustomerDto> {
    let customer = state.customers.get(id, &principal).await?;
    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerDto>),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<CustomerDto> {
    let customer = state
        .customers
        .update(id, request.into(), &principal)
        .await?;
    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}/driver-license",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = DriverLicenseRequest,
    responses(
        (status = 200, description = "License recorded", body = ApiResponse<CustomerDto>),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn update_driver_license(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<DriverLicenseRequest>,
) -> ApiResult<CustomerDto> {
    let customer = state
        .customers
        .update_driver_license(id, request.driver_license, &principal)
        .await?;
    Ok(Json(ApiResponse::success(customer.into())))
}
