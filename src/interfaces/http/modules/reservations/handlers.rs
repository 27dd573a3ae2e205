//! Reservation API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateReservationRequest, ListReservationsQuery, ReservationDto, UpdateReservationRequest,
};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::modules::rentals::ConvertedRentalDto;
use crate::interfaces::http::state::AppState;
use crate::shared::DomainError;

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created, car held", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid window or no driver license"),
        (status = 403, description = "Booking for another customer"),
        (status = 404, description = "Car or customer not found"),
        (status = 409, description = "Car not available for these dates")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let customer_id = request
        .customer_id
        .or(principal.customer_id)
        .ok_or_else(|| DomainError::Validation("customer_id is required".into()))?;
    let reservation = state
        .reservations
        .create(request.into_domain(customer_id), &principal)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ListReservationsQuery),
    responses(
        (status = 200, description = "Reservations visible to the caller", body = ApiResponse<Vec<ReservationDto>>),
        (status = 403, description = "Another customer's reservations")
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListReservationsQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let items = state
        .reservations
        .list(&principal, query.customer_id)
        .await?
        .into_iter()
        .map(ReservationDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.get(id, &principal).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Reservation is cancelled or completed")
    )
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .reservations
        .amend(id, request.into(), &principal)
        .await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Not pending"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Car no longer available")
    )
)]
pub async fn confirm_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.confirm(id, &principal).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled, car released", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Completed, already cancelled, or within 24h of pickup"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.cancel(id, &principal).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// Pickup: checks the reservation is confirmed and due, then starts the
/// rental from it.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/convert",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 201, description = "Rental started, deposit credited", body = ApiResponse<ConvertedRentalDto>),
        (status = 400, description = "Not confirmed, or before pickup date"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Car not reserved")
    )
)]
pub async fn convert_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<ApiResponse<ConvertedRentalDto>>), ApiError> {
    let handoff = state.reservations.convert_to_rental(id, &principal).await?;
    let rental = state
        .rentals
        .create_from_reservation(handoff.reservation_id, &principal)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ConvertedRentalDto::new(rental, &handoff))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation deleted"),
        (status = 400, description = "Completed reservations are kept")
    )
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.reservations.remove(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
