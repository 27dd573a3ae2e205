//! Car API handlers
//!
//! Reads are public; writes require a bearer token and the matching role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    AvailabilityDto, CarDto, CreateCarRequest, SetAvailabilityRequest, UpdateCarRequest,
    WindowQuery,
};
use crate::domain::car::Car;
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::state::AppState;
use crate::shared::DomainError;

fn cars_to_dto(cars: Vec<Car>) -> Vec<CarDto> {
    cars.into_iter().map(CarDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    responses((status = 200, description = "Active cars", body = ApiResponse<Vec<CarDto>>))
)]
pub async fn list_cars(State(state): State<AppState>) -> ApiResult<Vec<CarDto>> {
    let cars = state.cars.list_active().await?;
    Ok(Json(ApiResponse::success(cars_to_dto(cars))))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/available",
    tag = "Cars",
    params(WindowQuery),
    responses(
        (status = 200, description = "Available cars, optionally free over [start, end]", body = ApiResponse<Vec<CarDto>>),
        (status = 400, description = "start is not before end, or only one bound given")
    )
)]
pub async fn list_available_cars(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<Vec<CarDto>> {
    let cars = match (window.start, window.end) {
        (Some(start), Some(end)) => state.cars.find_available_between(start, end).await?,
        (None, None) => state.cars.list_available().await?,
        _ => {
            return Err(DomainError::Validation(
                "Both start and end are required for a date search".into(),
            )
            .into())
        }
    };
    Ok(Json(ApiResponse::success(cars_to_dto(cars))))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = i32, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Not found or retired")
    )
)]
pub async fn get_car(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<CarDto> {
    let car = state.cars.get(id).await?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/plate/{plate}",
    tag = "Cars",
    params(("plate" = String, Path, description = "License plate")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_car_by_plate(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> ApiResult<CarDto> {
    let car = state.cars.find_by_license_plate(&plate).await?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}/availability",
    tag = "Cars",
    params(("id" = i32, Path, description = "Car ID"), WindowQuery),
    responses(
        (status = 200, description = "Whether the car is free over the window", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Missing or inverted window"),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<AvailabilityDto> {
    let (Some(start), Some(end)) = (window.start, window.end) else {
        return Err(DomainError::Validation("start and end are required".into()).into());
    };
    let available = state.cars.is_free_between(id, start, end).await?;
    Ok(Json(ApiResponse::success(AvailabilityDto {
        car_id: id,
        available,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car registered", body = ApiResponse<CarDto>),
        (status = 400, description = "Invalid year, rate or type"),
        (status = 403, description = "Managers and admins only"),
        (status = 409, description = "License plate already registered")
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarDto>>), ApiError> {
    let car = state.cars.create(request.into_domain()?, &principal).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(car.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Car ID")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Car updated", body = ApiResponse<CarDto>),
        (status = 400, description = "Invalid change, e.g. rate while rented"),
        (status = 404, description = "Not found"),
        (status = 409, description = "License plate already registered")
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateCarRequest>,
) -> ApiResult<CarDto> {
    let car = state
        .cars
        .update(id, request.into_domain()?, &principal)
        .await?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/cars/{id}/availability",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Car ID")),
    request_body = SetAvailabilityRequest,
    responses(
        (status = 200, description = "Availability changed", body = ApiResponse<CarDto>),
        (status = 400, description = "Rented cars can only become Available"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn set_availability(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    Json(request): Json<SetAvailabilityRequest>,
) -> ApiResult<CarDto> {
    let car = state
        .cars
        .set_availability(id, request.parse()?, &principal)
        .await?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car retired"),
        (status = 400, description = "Car is rented or reserved"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.cars.soft_delete(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
