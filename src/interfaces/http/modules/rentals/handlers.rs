//! Rental API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CompleteRentalRequest, CreateRentalRequest, ListRentalsQuery, RentalDto,
    RentalFromReservationRequest,
};
use crate::application::RentalReturn;
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::state::AppState;

type Created = Result<(StatusCode, Json<ApiResponse<RentalDto>>), ApiError>;

#[utoipa::path(
    post,
    path = "/api/v1/rentals",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    request_body = CreateRentalRequest,
    responses(
        (status = 201, description = "Rental started", body = ApiResponse<RentalDto>),
        (status = 400, description = "Invalid dates"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Car or customer not found"),
        (status = 409, description = "Car not available")
    )
)]
pub async fn create_rental(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateRentalRequest>,
) -> Created {
    let rental = state
        .rentals
        .create_direct(request.into(), &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rental.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/rentals/from-reservation",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    request_body = RentalFromReservationRequest,
    responses(
        (status = 201, description = "Rental started, reservation completed", body = ApiResponse<RentalDto>),
        (status = 400, description = "Reservation not confirmed"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Car not reserved")
    )
)]
pub async fn create_rental_from_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<RentalFromReservationRequest>,
) -> Created {
    let rental = state
        .rentals
        .create_from_reservation(request.reservation_id, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rental.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(ListRentalsQuery),
    responses(
        (status = 200, description = "Rentals visible to the caller", body = ApiResponse<Vec<RentalDto>>),
        (status = 403, description = "Another customer's rentals")
    )
)]
pub async fn list_rentals(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListRentalsQuery>,
) -> ApiResult<Vec<RentalDto>> {
    let items = state
        .rentals
        .list(&principal, query.customer_id)
        .await?
        .into_iter()
        .map(RentalDto::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental details", body = ApiResponse<RentalDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_rental(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<RentalDto> {
    let rental = state.rentals.get(id, &principal).await?;
    Ok(Json(ApiResponse::success(rental.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/rentals/{id}/complete",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    request_body = CompleteRentalRequest,
    responses(
        (status = 200, description = "Rental completed, car available", body = ApiResponse<RentalDto>),
        (status = 400, description = "Not active, return before start, or mileage decreased"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn complete_rental(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CompleteRentalRequest>,
) -> ApiResult<RentalDto> {
    let details = RentalReturn {
        actual_return_date: request.actual_return_date,
        final_mileage: request.final_mileage,
    };
    let rental = state.rentals.complete(id, details, &principal).await?;
    Ok(Json(ApiResponse::success(rental.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rentals/{id}",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental deleted"),
        (status = 400, description = "Rental still active"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn delete_rental(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.rentals.remove(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
