//! Payment API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    BalanceDto, PaymentDto, RecordPaymentRequest, RefundPaymentRequest, UpdatePaymentStatusRequest,
};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Non-positive amount or unknown method"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), ApiError> {
    let payment = state
        .payments
        .record_payment(request.into_domain()?, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment.into()))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/payments/{id}/status",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> ApiResult<PaymentDto> {
    let payment = state
        .payments
        .update_status(id, request.parse()?, &principal)
        .await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/refund",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = RefundPaymentRequest,
    responses(
        (status = 200, description = "Payment refunded", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Not completed, or amount above what was paid"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RefundPaymentRequest>,
) -> ApiResult<PaymentDto> {
    let payment = state
        .payments
        .refund(id, request.amount, &request.reason, &principal)
        .await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Payments for the rental", body = ApiResponse<Vec<PaymentDto>>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn list_rental_payments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<PaymentDto>> {
    let items = state
        .payments
        .list_for_rental(id, &principal)
        .await?
        .into_iter()
        .map(PaymentDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}/balance",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Amount paid and outstanding", body = ApiResponse<BalanceDto>),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn rental_balance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<BalanceDto> {
    let balance = state.payments.balance(id, &principal).await?;
    Ok(Json(ApiResponse::success(balance.into())))
}
