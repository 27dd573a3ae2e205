//! Cross-cutting guarantees: no double booking, the availability flag
//! agrees with live claims, and payment balances add up.

mod common;

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use tokio::sync::Barrier;

use car_rental::domain::car::CarAvailability;
use car_rental::domain::payment::{NewPayment, PaymentMethod, PaymentStatus};
use car_rental::domain::rental::DirectRentalRequest;
use car_rental::domain::reservation::NewReservation;
use car_rental::domain::DomainError;

use common::{customer_principal, employee, setup, setup_with, t0, TempDatabase, TestApp};

async fn assert_no_overlapping_claims(app: &TestApp, car_id: i32) {
    let mut ranges: Vec<_> = app
        .repos
        .reservations()
        .find_blocking_for_cars(&[car_id])
        .await
        .unwrap()
        .iter()
        .map(|r| r.range())
        .collect();
    ranges.extend(
        app.repos
            .rentals()
            .find_active_for_cars(&[car_id])
            .await
            .unwrap()
            .iter()
            .map(|r| r.range()),
    );

    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            assert!(!a.overlaps(b), "overlapping claims {:?} and {:?}", a, b);
        }
    }
}

async fn has_live_claim(app: &TestApp, car_id: i32) -> bool {
    let reservations = app
        .repos
        .reservations()
        .find_blocking_for_cars(&[car_id])
        .await
        .unwrap();
    let rentals = app
        .repos
        .rentals()
        .find_active_for_cars(&[car_id])
        .await
        .unwrap();
    !reservations.is_empty() || !rentals.is_empty()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_book_a_car_once() {
    const CONTENDERS: usize = 6;

    let file = TempDatabase::new();
    let app = setup_with(&file.config(CONTENDERS as u32)).await;
    let car = app.car("KDB 100A", 100).await;
    let mut customers = Vec::new();
    for i in 0..CONTENDERS {
        customers.push(app.customer(&format!("Contender{i}")).await);
    }

    let start = t0() + Duration::days(1);
    let gate = Arc::new(Barrier::new(CONTENDERS));
    let mut tasks = Vec::new();
    for (i, customer) in customers.iter().enumerate() {
        let state = app.state.clone();
        let gate = gate.clone();
        let request = NewReservation {
            car_id: car.id,
            customer_id: customer.id,
            pickup_date: start + Duration::hours(i as i64),
            return_date: start + Duration::days(3),
            pickup_location_id: None,
            return_location_id: None,
            advance_payment: None,
        };
        let principal = customer_principal(customer.id);
        tasks.push(tokio::spawn(async move {
            gate.wait().await;
            state.reservations.create(request, &principal).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, DomainError::Conflict(_)), "unexpected error {:?}", e),
        }
    }
    assert_eq!(successes, 1);
    assert_no_overlapping_claims(&app, car.id).await;
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Reserved);
}

#[tokio::test]
async fn availability_flag_tracks_claims_through_lifecycle() {
    let app = setup().await;
    let car = app.car("KDB 101A", 100).await;
    let customer = app.customer("Pendo").await;
    let staff = employee();

    assert!(!has_live_claim(&app, car.id).await);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);

    let start = t0() + Duration::days(2);
    let reservation = app.reserve(car.id, customer.id, start, 2).await.unwrap();
    assert!(has_live_claim(&app, car.id).await);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Reserved);

    app.state.reservations.confirm(reservation.id, &staff).await.unwrap();
    let rental = app
        .state
        .rentals
        .create_from_reservation(reservation.id, &staff)
        .await
        .unwrap();
    assert!(has_live_claim(&app, car.id).await);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Rented);
    assert_no_overlapping_claims(&app, car.id).await;

    app.clock.set(rental.rental_end_date);
    app.state
        .rentals
        .complete(
            rental.id,
            car_rental::application::RentalReturn {
                actual_return_date: None,
                final_mileage: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert!(!has_live_claim(&app, car.id).await);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);
}

#[tokio::test]
async fn deleting_pending_reservation_releases_car() {
    let app = setup().await;
    let car = app.car("KDB 102A", 100).await;
    let customer = app.customer("Rehema").await;

    let reservation = app
        .reserve(car.id, customer.id, t0() + Duration::days(2), 2)
        .await
        .unwrap();
    app.state
        .reservations
        .remove(reservation.id, &customer_principal(customer.id))
        .await
        .unwrap();

    assert!(!has_live_claim(&app, car.id).await);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);
}

#[tokio::test]
async fn availability_search_skips_claimed_windows() {
    let app = setup().await;
    let busy = app.car("KDB 103A", 100).await;
    let idle = app.car("KDB 104A", 100).await;
    let customer = app.customer("Said").await;

    let start = t0() + Duration::days(2);
    app.reserve(busy.id, customer.id, start, 3).await.unwrap();

    let found = app
        .state
        .cars
        .find_available_between(start, start + Duration::days(1))
        .await
        .unwrap();
    let ids: Vec<i32> = found.iter().map(|c| c.id).collect();
    assert!(ids.contains(&idle.id));
    assert!(!ids.contains(&busy.id));

    // Touching the end of the reservation still counts as overlapping
    let touching = app
        .state
        .cars
        .is_free_between(busy.id, start + Duration::days(3), start + Duration::days(4))
        .await
        .unwrap();
    assert!(!touching);

    let later = app
        .state
        .cars
        .is_free_between(busy.id, start + Duration::days(5), start + Duration::days(6))
        .await
        .unwrap();
    assert!(later);

    let inverted = app
        .state
        .cars
        .is_free_between(busy.id, start + Duration::days(2), start)
        .await;
    assert!(matches!(inverted, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn payments_reduce_outstanding_balance() {
    let app = setup().await;
    let car = app.car("KDB 105A", 100).await;
    let customer = app.customer("Tumaini").await;
    let staff = employee();

    let start = t0() + Duration::hours(1);
    let rental = app
        .state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: car.id,
                customer_id: customer.id,
                rental_start_date: start,
                rental_end_date: start + Duration::days(4),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert_eq!(rental.total_amount, Decimal::from(400));

    let payment = |amount: i64, status| NewPayment {
        rental_id: rental.id,
        amount: Decimal::from(amount),
        payment_method: PaymentMethod::Mpesa,
        status,
        transaction_id: None,
        notes: None,
    };

    app.state
        .payments
        .record_payment(payment(150, PaymentStatus::Completed), &staff)
        .await
        .unwrap();
    let pending = app
        .state
        .payments
        .record_payment(payment(100, PaymentStatus::Pending), &staff)
        .await
        .unwrap();

    let balance = app
        .state
        .payments
        .balance(rental.id, &customer_principal(customer.id))
        .await
        .unwrap();
    assert_eq!(balance.paid, Decimal::from(150));
    assert_eq!(balance.outstanding, Decimal::from(250));

    app.state
        .payments
        .update_status(pending.id, PaymentStatus::Completed, &staff)
        .await
        .unwrap();
    let balance = app.state.payments.balance(rental.id, &staff).await.unwrap();
    assert_eq!(balance.outstanding, Decimal::from(150));

    let zero = app
        .state
        .payments
        .record_payment(payment(0, PaymentStatus::Completed), &staff)
        .await;
    assert!(matches!(zero, Err(DomainError::Validation(_))));

    let orphan = app
        .state
        .payments
        .record_payment(
            NewPayment {
                rental_id: 9_999,
                ..payment(10, PaymentStatus::Completed)
            },
            &staff,
        )
        .await;
    assert!(matches!(orphan, Err(DomainError::NotFound { .. })));

    let listed = app
        .state
        .payments
        .list_for_rental(rental.id, &customer_principal(customer.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let stranger = app
        .state
        .payments
        .list_for_rental(rental.id, &customer_principal(customer.id + 1))
        .await;
    assert!(matches!(stranger, Err(DomainError::Forbidden(_))));
}

#[tokio::test]
async fn store_constraints_surface_as_domain_errors() {
    let app = setup().await;
    let car = app.car("KDB 106A", 100).await;

    // Straight to the repository, past the service-level duplicate check
    let twin = app
        .repos
        .cars()
        .insert(common::new_car("KDB 106A", 80), t0())
        .await;
    assert!(matches!(twin, Err(DomainError::Conflict(_))), "got {:?}", twin);

    let dangling = app
        .repos
        .payments()
        .insert(
            NewPayment {
                rental_id: 9_999,
                amount: Decimal::from(10),
                payment_method: PaymentMethod::Cash,
                status: PaymentStatus::Completed,
                transaction_id: None,
                notes: None,
            },
            t0(),
        )
        .await;
    assert!(matches!(dangling, Err(DomainError::Validation(_))), "got {:?}", dangling);

    assert_eq!(app.reload_car(car.id).await.license_plate, "KDB 106A");
}
