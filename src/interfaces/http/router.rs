//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::middleware::{auth_middleware, AuthState};
use super::modules::{
    auth, cars, customers, health, insurance, locations, maintenance, metrics, payments, rentals,
    request_id, reservations, users,
};
use super::state::AppState;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::create_staff_user,
        // Cars
        cars::list_cars,
        cars::list_available_cars,
        cars::get_car,
        cars::get_car_by_plate,
        cars::check_availability,
        cars::create_car,
        cars::update_car,
        cars::set_availability,
        cars::delete_car,
        // Customers
        customers::create_customer,
        customers::list_customers,
        customers::get_customer,
        customers::update_customer,
        customers::update_driver_license,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::update_location,
        locations::deactivate_location,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::confirm_reservation,
        reservations::cancel_reservation,
        reservations::convert_reservation,
        reservations::delete_reservation,
        // Rentals
        rentals::create_rental,
        rentals::create_rental_from_reservation,
        rentals::list_rentals,
        rentals::get_rental,
        rentals::complete_rental,
        rentals::delete_rental,
        // Payments
        payments::record_payment,
        payments::update_payment_status,
        payments::refund_payment,
        payments::list_rental_payments,
        payments::rental_balance,
        // Maintenance
        maintenance::schedule_maintenance,
        maintenance::list_maintenance,
        maintenance::list_car_maintenance,
        maintenance::get_maintenance,
        maintenance::update_maintenance,
        maintenance::start_maintenance,
        maintenance::complete_maintenance,
        maintenance::cancel_maintenance,
        maintenance::delete_maintenance,
        // Insurance
        insurance::create_insurance,
        insurance::list_insurance,
        insurance::list_active_insurance,
        insurance::get_insurance,
        insurance::update_insurance,
        insurance::renew_insurance,
        insurance::delete_insurance,
        // Users
        users::list_users,
        users::user_stats,
        users::get_user,
        users::update_user_role,
        users::update_user_status,
        users::change_password,
        users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            auth::CreateStaffRequest,
            cars::CarDto,
            cars::CreateCarRequest,
            cars::UpdateCarRequest,
            cars::SetAvailabilityRequest,
            cars::AvailabilityDto,
            customers::CustomerDto,
            customers::CreateCustomerRequest,
            customers::UpdateCustomerRequest,
            customers::DriverLicenseRequest,
            locations::LocationDto,
            locations::CreateLocationRequest,
            locations::UpdateLocationRequest,
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            rentals::RentalDto,
            rentals::ConvertedRentalDto,
            rentals::CreateRentalRequest,
            rentals::RentalFromReservationRequest,
            rentals::CompleteRentalRequest,
            payments::PaymentDto,
            payments::RecordPaymentRequest,
            payments::UpdatePaymentStatusRequest,
            payments::RefundPaymentRequest,
            payments::BalanceDto,
            maintenance::MaintenanceDto,
            maintenance::CreateMaintenanceRequest,
            maintenance::UpdateMaintenanceRequest,
            maintenance::CompleteMaintenanceRequest,
            insurance::InsuranceDto,
            insurance::CreateInsuranceRequest,
            insurance::UpdateInsuranceRequest,
            insurance::RenewInsuranceRequest,
            users::UpdateRoleRequest,
            users::UpdateStatusRequest,
            users::ChangePasswordRequest,
            users::UserStatsDto,
            users::RoleCountDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login (JWT), customer registration, staff accounts"),
        (name = "Cars", description = "Fleet registry and availability"),
        (name = "Customers", description = "Customer records"),
        (name = "Locations", description = "Pickup and return branches"),
        (name = "Reservations", description = "Booking lifecycle: pending, confirmed, cancelled, completed"),
        (name = "Rentals", description = "Rental lifecycle: start, return, late fees"),
        (name = "Payments", description = "Payments recorded against rentals, refunds"),
        (name = "Maintenance", description = "Workshop schedule and car downtime"),
        (name = "Insurance", description = "Insurance policies per car"),
        (name = "Users", description = "Account administration"),
    ),
    info(
        title = "Car Rental API",
        version = "1.0.0",
        description = "REST API for fleet, reservation and rental management",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full HTTP router.
///
/// `metrics_handle` is `None` when no Prometheus recorder is installed (tests);
/// `/metrics` is then not mounted.
pub fn create_api_router(
    state: AppState,
    db: DatabaseConnection,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState {
        jwt_config: state.identity.jwt_config().clone(),
    };

    // Public reads
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/cars", get(cars::list_cars))
        .route("/cars/available", get(cars::list_available_cars))
        .route("/cars/plate/{plate}", get(cars::get_car_by_plate))
        .route("/cars/{id}", get(cars::get_car))
        .route("/cars/{id}/availability", get(cars::check_availability))
        .route("/locations", get(locations::list_locations))
        .route("/locations/{id}", get(locations::get_location));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/users", post(auth::create_staff_user))
        // Cars
        .route("/cars", post(cars::create_car))
        .route("/cars/{id}", put(cars::update_car).delete(cars::delete_car))
        .route("/cars/{id}/availability", patch(cars::set_availability))
        // Customers
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer).put(customers::update_customer),
        )
        .route(
            "/customers/{id}/driver-license",
            put(customers::update_driver_license),
        )
        // Locations
        .route("/locations", post(locations::create_location))
        .route(
            "/locations/{id}",
            put(locations::update_location).delete(locations::deactivate_location),
        )
        // Reservations
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route(
            "/reservations/{id}/confirm",
            post(reservations::confirm_reservation),
        )
        .route(
            "/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/reservations/{id}/convert",
            post(reservations::convert_reservation),
        )
        // Rentals
        .route(
            "/rentals",
            get(rentals::list_rentals).post(rentals::create_rental),
        )
        .route(
            "/rentals/from-reservation",
            post(rentals::create_rental_from_reservation),
        )
        .route(
            "/rentals/{id}",
            get(rentals::get_rental).delete(rentals::delete_rental),
        )
        .route("/rentals/{id}/complete", post(rentals::complete_rental))
        .route("/rentals/{id}/payments", get(payments::list_rental_payments))
        .route("/rentals/{id}/balance", get(payments::rental_balance))
        // Payments
        .route("/payments", post(payments::record_payment))
        .route(
            "/payments/{id}/status",
            patch(payments::update_payment_status),
        )
        .route("/payments/{id}/refund", post(payments::refund_payment))
        // Maintenance
        .route(
            "/maintenance",
            get(maintenance::list_maintenance).post(maintenance::schedule_maintenance),
        )
        .route(
            "/maintenance/{id}",
            get(maintenance::get_maintenance)
                .put(maintenance::update_maintenance)
                .delete(maintenance::delete_maintenance),
        )
        .route("/maintenance/{id}/start", post(maintenance::start_maintenance))
        .route(
            "/maintenance/{id}/complete",
            post(maintenance::complete_maintenance),
        )
        .route("/maintenance/{id}/cancel", post(maintenance::cancel_maintenance))
        .route("/cars/{id}/maintenance", get(maintenance::list_car_maintenance))
        // Insurance
        .route(
            "/insurance",
            get(insurance::list_insurance).post(insurance::create_insurance),
        )
        .route("/insurance/active", get(insurance::list_active_insurance))
        .route(
            "/insurance/{id}",
            get(insurance::get_insurance)
                .put(insurance::update_insurance)
                .delete(insurance::delete_insurance),
        )
        .route("/insurance/{id}/renew", post(insurance::renew_insurance))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/stats", get(users::user_stats))
        .route("/users/me/password", put(users::change_password))
        .route(
            "/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/users/{id}/role", patch(users::update_user_role))
        .route("/users/{id}/status", patch(users::update_user_status))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api = public_routes.merge(protected_routes).with_state(state);

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        .nest("/api/v1", api);

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
