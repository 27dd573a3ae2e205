//! REST surface: routing, authentication and error mapping.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use car_rental::create_api_router;

use common::{setup, t0, TestApp};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

async fn app_with_admin() -> (TestApp, Router) {
    let app = setup().await;
    app.state
        .identity
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    let router = create_api_router(app.state.clone(), app.db.clone(), None);
    (app, router)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(router: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn register_customer(router: &Router, email: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "customer-pass",
            "first_name": "Wanjiku",
            "last_name": "Mwangi",
            "phone_number": "+254711000000",
            "address": "Kenyatta Ave 10",
            "driver_license": "DL-998877"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    assert_eq!(body["data"]["role"], "customer");
    login(router, email, "customer-pass").await
}

fn car_body(plate: &str) -> Value {
    json!({
        "model": "Axio",
        "manufacturer": "Toyota",
        "year": 2021,
        "color": "Silver",
        "car_type": "Sedan",
        "fuel_type": "Petrol",
        "rental_rate": "100.00",
        "license_plate": plate,
        "mileage": 5000
    })
}

#[tokio::test]
async fn health_reports_database() {
    let (_app, router) = app_with_admin().await;
    let (status, body) = send(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let (_app, router) = app_with_admin().await;

    let (status, body) = send(&router, Method::GET, "/api/v1/reservations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &router,
        Method::GET,
        "/api/v1/reservations",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Car reads are public
    let (status, body) = send(&router, Method::GET, "/api/v1/cars", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/cars",
        None,
        Some(car_body("KDC 001A")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let (_app, router) = app_with_admin().await;
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn request_bodies_are_validated() {
    let (_app, router) = app_with_admin().await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn booking_flow_over_http() {
    let (_app, router) = app_with_admin().await;
    let admin = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/cars",
        Some(&admin),
        Some(car_body("KDC 002A")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let car_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["availability"], "Available");

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/cars",
        Some(&admin),
        Some(car_body("KDC 002A")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let customer = register_customer(&router, "wanjiku@example.com").await;

    let pickup = t0() + Duration::days(2);
    let reservation = json!({
        "car_id": car_id,
        "pickup_date": pickup.to_rfc3339(),
        "return_date": (pickup + Duration::days(3)).to_rfc3339()
    });
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/reservations",
        Some(&customer),
        Some(reservation.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "pending");
    let reservation_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/reservations",
        Some(&customer),
        Some(reservation),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(&router, Method::GET, &format!("/api/v1/cars/{}", car_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availability"], "Reserved");

    // Customers may not confirm
    let confirm_uri = format!("/api/v1/reservations/{}/confirm", reservation_id);
    let (status, _) = send(&router, Method::POST, &confirm_uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&router, Method::POST, &confirm_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "confirmed");

    let (status, body) = send(&router, Method::GET, "/api/v1/reservations", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/v1/reservations/9999",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let (_app, router) = app_with_admin().await;
    register_customer(&router, "dup@example.com").await;

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": "dup@example.com",
            "password": "another-pass",
            "first_name": "Dup",
            "last_name": "User",
            "phone_number": "+254722000000",
            "address": "",
            "driver_license": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn current_user_comes_from_token() {
    let (_app, router) = app_with_admin().await;
    let admin = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(&router, Method::GET, "/api/v1/auth/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn ids_and_refunds_are_checked_at_the_edge() {
    let (_app, router) = app_with_admin().await;
    let admin = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let start = t0() + Duration::days(1);
    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/rentals",
        Some(&admin),
        Some(json!({
            "car_id": 0,
            "customer_id": 1,
            "rental_start_date": start.to_rfc3339(),
            "rental_end_date": (start + Duration::days(2)).to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/payments/1/refund",
        Some(&admin),
        Some(json!({ "amount": "10.00", "reason": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/payments/999/refund",
        Some(&admin),
        Some(json!({ "amount": "10.00", "reason": "Goodwill" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_admin_over_http() {
    let (_app, router) = app_with_admin().await;
    let admin = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let customer = register_customer(&router, "walkin@example.com").await;

    let (status, body) = send(&router, Method::GET, "/api/v1/users/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["inactive"], 0);

    let (status, _) = send(&router, Method::GET, "/api/v1/users", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&router, Method::GET, "/api/v1/auth/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let admin_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/api/v1/users/{}/status", admin_id),
        Some(&admin),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::PUT,
        "/api/v1/users/me/password",
        Some(&customer),
        Some(json!({ "current_password": "customer-pass", "new_password": "even-better-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(&router, "walkin@example.com", "even-better-pass").await;
}
