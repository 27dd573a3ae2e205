//! End-to-end booking flows against the real SeaORM repositories.

mod common;

use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use car_rental::application::RentalReturn;
use car_rental::domain::car::{CarAvailability, CarChanges, NewCar};
use car_rental::domain::location::NewLocation;
use car_rental::domain::rental::{DirectRentalRequest, RentalStatus};
use car_rental::domain::reservation::{NewReservation, ReservationChanges, ReservationStatus};
use car_rental::domain::DomainError;

use common::{admin, customer_principal, employee, setup, t0};

#[tokio::test]
async fn reservation_holds_car_and_blocks_overlapping_request() {
    let app = setup().await;
    let car = app.car("KDA 001A", 100).await;
    let customer = app.customer("Amina").await;
    let other = app.customer("Brian").await;

    let start = t0() + Duration::hours(2);
    let reservation = app.reserve(car.id, customer.id, start, 3).await.unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.reservation_date, t0());
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Reserved);

    let clash = app
        .reserve(car.id, other.id, start + Duration::days(1), 2)
        .await;
    assert!(matches!(clash, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn confirmed_reservation_becomes_rental_and_returns_late() {
    let app = setup().await;
    let car = app.car("KDA 002A", 100).await;
    let customer = app.customer("Amina").await;
    let staff = employee();

    let start = t0() + Duration::hours(2);
    let reservation = app.reserve(car.id, customer.id, start, 3).await.unwrap();

    let confirmed = app
        .state
        .reservations
        .confirm(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Reserved);

    // Pickup has not arrived yet
    let early = app
        .state
        .reservations
        .convert_to_rental(reservation.id, &staff)
        .await;
    match early {
        Err(DomainError::Validation(msg)) => assert!(msg.contains("before pickup date")),
        other => panic!("expected validation error, got {:?}", other),
    }

    app.clock.set(start);
    let handoff = app
        .state
        .reservations
        .convert_to_rental(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(handoff.car_id, car.id);
    assert_eq!(handoff.rental_end_date, reservation.return_date);

    let rental = app
        .state
        .rentals
        .create_from_reservation(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(rental.status, RentalStatus::Active);
    assert_eq!(rental.reservation_id, Some(reservation.id));
    assert_eq!(rental.total_amount, Decimal::from(300));
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Rented);

    let consumed = app
        .state
        .reservations
        .get(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(consumed.status, ReservationStatus::Completed);

    // Two days late
    let returned_at = rental.rental_end_date + Duration::days(2);
    app.clock.set(returned_at);
    let completed = app
        .state
        .rentals
        .complete(
            rental.id,
            RentalReturn {
                actual_return_date: Some(returned_at),
                final_mileage: Some(12_450),
            },
            &staff,
        )
        .await
        .unwrap();

    assert_eq!(completed.status, RentalStatus::Completed);
    assert_eq!(completed.late_fee, Decimal::from(100));
    assert_eq!(completed.total_amount, Decimal::from(400));
    assert_eq!(completed.actual_return_date, Some(returned_at));

    let car = app.reload_car(car.id).await;
    assert_eq!(car.availability, CarAvailability::Available);
    assert_eq!(car.mileage, 12_450);
}

#[tokio::test]
async fn completing_twice_does_not_charge_twice() {
    let app = setup().await;
    let car = app.car("KDA 003A", 80).await;
    let customer = app.customer("Chege").await;
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
                rental_end_date: start + Duration::days(2),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert_eq!(rental.total_amount, Decimal::from(160));

    let late = rental.rental_end_date + Duration::hours(30);
    let details = RentalReturn {
        actual_return_date: Some(late),
        final_mileage: None,
    };
    let first = app
        .state
        .rentals
        .complete(rental.id, details.clone(), &staff)
        .await
        .unwrap();
    assert_eq!(first.late_fee, Decimal::from(100));

    let second = app.state.rentals.complete(rental.id, details, &staff).await;
    assert!(matches!(second, Err(DomainError::Validation(_))));

    let stored = app.state.rentals.get(rental.id, &staff).await.unwrap();
    assert_eq!(stored.late_fee, Decimal::from(100));
    assert_eq!(stored.total_amount, Decimal::from(260));
}

#[tokio::test]
async fn return_defaults_to_clock_time() {
    let app = setup().await;
    let car = app.car("KDA 004A", 50).await;
    let customer = app.customer("Dan").await;
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
                rental_end_date: start + Duration::days(1),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();

    app.clock.set(start + Duration::hours(20));
    let completed = app
        .state
        .rentals
        .complete(
            rental.id,
            RentalReturn {
                actual_return_date: None,
                final_mileage: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert_eq!(completed.actual_return_date, Some(start + Duration::hours(20)));
    assert_eq!(completed.late_fee, Decimal::ZERO);
}

#[tokio::test]
async fn cancellation_respects_cutoff() {
    let app = setup().await;
    let car = app.car("KDA 005A", 100).await;
    let customer = app.customer("Esther").await;
    let owner = customer_principal(customer.id);

    let pickup = t0() + Duration::days(3);
    let reservation = app.reserve(car.id, customer.id, pickup, 2).await.unwrap();
    app.state
        .reservations
        .confirm(reservation.id, &employee())
        .await
        .unwrap();

    app.clock.set(pickup - Duration::hours(3));
    let too_late = app.state.reservations.cancel(reservation.id, &owner).await;
    assert!(matches!(too_late, Err(DomainError::Validation(_))));
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Reserved);

    app.clock.set(pickup - Duration::hours(30));
    let cancelled = app
        .state
        .reservations
        .cancel(reservation.id, &owner)
        .await
        .unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);

    let again = app.state.reservations.cancel(reservation.id, &owner).await;
    assert!(matches!(again, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn customers_cannot_touch_other_customers_bookings() {
    let app = setup().await;
    let car = app.car("KDA 006A", 100).await;
    let owner = app.customer("Faith").await;
    let stranger = app.customer("George").await;

    let reservation = app
        .reserve(car.id, owner.id, t0() + Duration::days(2), 1)
        .await
        .unwrap();

    let peek = app
        .state
        .reservations
        .get(reservation.id, &customer_principal(stranger.id))
        .await;
    assert!(matches!(peek, Err(DomainError::Forbidden(_))));

    let cancel = app
        .state
        .reservations
        .cancel(reservation.id, &customer_principal(stranger.id))
        .await;
    assert!(matches!(cancel, Err(DomainError::Forbidden(_))));

    let foreign_list = app
        .state
        .reservations
        .list(&customer_principal(stranger.id), Some(owner.id))
        .await;
    assert!(matches!(foreign_list, Err(DomainError::Forbidden(_))));

    let own_list = app
        .state
        .reservations
        .list(&customer_principal(owner.id), None)
        .await
        .unwrap();
    assert_eq!(own_list.len(), 1);

    let confirm = app
        .state
        .reservations
        .confirm(reservation.id, &customer_principal(owner.id))
        .await;
    assert!(matches!(confirm, Err(DomainError::Forbidden(_))));
}

#[tokio::test]
async fn booking_requires_driver_license() {
    let app = setup().await;
    let car = app.car("KDA 007A", 100).await;
    let unlicensed = app
        .state
        .customers
        .create(common::new_customer("Hassan", None), &employee())
        .await
        .unwrap();

    let result = app
        .reserve(car.id, unlicensed.id, t0() + Duration::days(1), 1)
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);
}

#[tokio::test]
async fn booking_window_rules() {
    let app = setup().await;
    let car = app.car("KDA 008A", 100).await;
    let customer = app.customer("Imani").await;

    // Inside the one hour lead time
    let rushed = app
        .reserve(car.id, customer.id, t0() + Duration::minutes(30), 1)
        .await;
    assert!(matches!(rushed, Err(DomainError::Validation(_))));

    let past = app
        .reserve(car.id, customer.id, t0() - Duration::days(1), 2)
        .await;
    assert!(matches!(past, Err(DomainError::Validation(_))));

    let too_long = app
        .reserve(car.id, customer.id, t0() + Duration::days(1), 31)
        .await;
    assert!(matches!(too_long, Err(DomainError::Validation(_))));

    let missing_car = app
        .reserve(9_999, customer.id, t0() + Duration::days(1), 1)
        .await;
    assert!(matches!(missing_car, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn direct_rental_only_checks_car_flag_and_active_rentals() {
    let app = setup().await;
    let reserved_car = app.car("KDA 009A", 100).await;
    let free_car = app.car("KDA 010A", 100).await;
    let customer = app.customer("Juma").await;
    let staff = employee();

    app.reserve(reserved_car.id, customer.id, t0() + Duration::days(1), 2)
        .await
        .unwrap();

    let request = |car_id| DirectRentalRequest {
        car_id,
        customer_id: customer.id,
        rental_start_date: t0() + Duration::days(10),
        rental_end_date: t0() + Duration::days(12),
        pickup_location_id: None,
        return_location_id: None,
    };

    // The reservation's Reserved flag blocks a walk-in, even for later dates
    let blocked = app
        .state
        .rentals
        .create_direct(request(reserved_car.id), &staff)
        .await;
    assert!(matches!(blocked, Err(DomainError::Conflict(_))));

    app.state
        .rentals
        .create_direct(request(free_car.id), &staff)
        .await
        .unwrap();
    let rented_again = app
        .state
        .rentals
        .create_direct(request(free_car.id), &staff)
        .await;
    assert!(matches!(rented_again, Err(DomainError::Conflict(_))));

    let by_customer = app
        .state
        .rentals
        .create_direct(request(free_car.id), &customer_principal(customer.id))
        .await;
    assert!(matches!(by_customer, Err(DomainError::Forbidden(_))));
}

#[tokio::test]
async fn discounts_apply_to_rental_totals() {
    let app = setup().await;
    let customer = app.customer("Kamau").await;
    let staff = employee();
    let start = t0() + Duration::hours(2);

    let weekly_car = app.car("KDA 011A", 100).await;
    let weekly = app.reserve(weekly_car.id, customer.id, start, 7).await.unwrap();
    app.state.reservations.confirm(weekly.id, &staff).await.unwrap();
    let weekly_rental = app
        .state
        .rentals
        .create_from_reservation(weekly.id, &staff)
        .await
        .unwrap();
    assert_eq!(weekly_rental.total_amount, Decimal::from(630));

    let monthly_car = app.car("KDA 012A", 100).await;
    let monthly = app
        .state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: monthly_car.id,
                customer_id: customer.id,
                rental_start_date: start,
                rental_end_date: start + Duration::days(30),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert_eq!(monthly.total_amount, Decimal::from(2160));

    let short_car = app.car("KDA 013A", 100).await;
    let short = app
        .state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: short_car.id,
                customer_id: customer.id,
                rental_start_date: start,
                rental_end_date: start + Duration::days(5) + Duration::hours(20),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();
    assert_eq!(short.total_amount, Decimal::from(600));
}

#[tokio::test]
async fn car_lifecycle_guards() {
    let app = setup().await;
    let car = app.car("KDA 014A", 100).await;
    let customer = app.customer("Lilian").await;

    let duplicate = app
        .state
        .cars
        .create(common::new_car("KDA 014A", 90), &admin())
        .await;
    assert!(matches!(duplicate, Err(DomainError::Conflict(_))));

    let by_employee = app
        .state
        .cars
        .create(common::new_car("KDA 015A", 90), &employee())
        .await;
    assert!(matches!(by_employee, Err(DomainError::Forbidden(_))));

    app.reserve(car.id, customer.id, t0() + Duration::days(1), 1)
        .await
        .unwrap();
    let delete_reserved = app.state.cars.soft_delete(car.id, &admin()).await;
    assert!(matches!(delete_reserved, Err(DomainError::Validation(_))));

    let spare = app.car("KDA 016A", 100).await;
    app.state.cars.soft_delete(spare.id, &admin()).await.unwrap();
    let gone = app.state.cars.get(spare.id).await;
    assert!(matches!(gone, Err(DomainError::NotFound { .. })));
    let listed = app.state.cars.list_active().await.unwrap();
    assert!(listed.iter().all(|c| c.id != spare.id));
}

#[tokio::test]
async fn rented_car_can_only_go_back_to_available() {
    let app = setup().await;
    let car = app.car("KDA 017A", 100).await;
    let customer = app.customer("Moses").await;
    let staff = employee();

    app.state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: car.id,
                customer_id: customer.id,
                rental_start_date: t0() + Duration::hours(1),
                rental_end_date: t0() + Duration::days(1),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();

    let to_maintenance = app
        .state
        .cars
        .set_availability(car.id, CarAvailability::Maintenance, &staff)
        .await;
    assert!(matches!(to_maintenance, Err(DomainError::Validation(_))));

    let back = app
        .state
        .cars
        .set_availability(car.id, CarAvailability::Available, &staff)
        .await
        .unwrap();
    assert_eq!(back.availability, CarAvailability::Available);
}

#[tokio::test]
async fn rental_from_reservation_needs_confirmation_and_a_reserved_car() {
    let app = setup().await;
    let car = app.car("KDA 018A", 100).await;
    let customer = app.customer("Neema").await;
    let staff = employee();

    let reservation = app
        .reserve(car.id, customer.id, t0() + Duration::hours(2), 2)
        .await
        .unwrap();

    let pending = app
        .state
        .rentals
        .create_from_reservation(reservation.id, &staff)
        .await;
    assert!(matches!(pending, Err(DomainError::Validation(_))));

    app.state
        .reservations
        .confirm(reservation.id, &staff)
        .await
        .unwrap();
    app.state
        .cars
        .set_availability(car.id, CarAvailability::Maintenance, &staff)
        .await
        .unwrap();

    let not_reserved = app
        .state
        .rentals
        .create_from_reservation(reservation.id, &staff)
        .await;
    assert!(matches!(not_reserved, Err(DomainError::Conflict(_))));

    let untouched = app
        .state
        .reservations
        .get(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(untouched.status, ReservationStatus::Confirmed);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Maintenance);
}

#[tokio::test]
async fn rental_from_reservation_does_not_wait_for_pickup() {
    let app = setup().await;
    let car = app.car("KDA 019A", 100).await;
    let customer = app.customer("Omondi").await;
    let staff = employee();

    let pickup = t0() + Duration::days(2);
    let reservation = app.reserve(car.id, customer.id, pickup, 2).await.unwrap();
    app.state
        .reservations
        .confirm(reservation.id, &staff)
        .await
        .unwrap();

    let rental = app
        .state
        .rentals
        .create_from_reservation(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(rental.rental_start_date, pickup);
    assert_eq!(rental.created_at, t0());
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Rented);
}

#[tokio::test]
async fn confirm_conflicts_with_a_walk_in_on_the_same_dates() {
    let app = setup().await;
    let car = app.car("KDA 020A", 100).await;
    let customer = app.customer("Pendo").await;
    let walk_in = app.customer("Rashid").await;
    let staff = employee();

    let start = t0() + Duration::hours(2);
    let reservation = app.reserve(car.id, customer.id, start, 3).await.unwrap();

    // Staff clear the hold by hand, then rent the car out over the same days
    app.state
        .cars
        .set_availability(car.id, CarAvailability::Available, &staff)
        .await
        .unwrap();
    app.state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: car.id,
                customer_id: walk_in.id,
                rental_start_date: start + Duration::days(1),
                rental_end_date: start + Duration::days(2),
                pickup_location_id: None,
                return_location_id: None,
            },
            &staff,
        )
        .await
        .unwrap();

    let confirm = app
        .state
        .reservations
        .confirm(reservation.id, &staff)
        .await;
    assert!(matches!(confirm, Err(DomainError::Conflict(_))));

    let still_pending = app
        .state
        .reservations
        .get(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(still_pending.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn customers_only_see_their_own_rentals() {
    let app = setup().await;
    let car = app.car("KDA 021A", 100).await;
    let owner = app.customer("Sauda").await;
    let stranger = app.customer("Tobias").await;

    let rental = app
        .state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: car.id,
                customer_id: owner.id,
                rental_start_date: t0() + Duration::hours(1),
                rental_end_date: t0() + Duration::days(2),
                pickup_location_id: None,
                return_location_id: None,
            },
            &employee(),
        )
        .await
        .unwrap();

    let own = app
        .state
        .rentals
        .get(rental.id, &customer_principal(owner.id))
        .await
        .unwrap();
    assert_eq!(own.id, rental.id);

    let peek = app
        .state
        .rentals
        .get(rental.id, &customer_principal(stranger.id))
        .await;
    assert!(matches!(peek, Err(DomainError::Forbidden(_))));

    let stranger_list = app
        .state
        .rentals
        .list(&customer_principal(stranger.id), None)
        .await
        .unwrap();
    assert!(stranger_list.is_empty());

    let foreign_list = app
        .state
        .rentals
        .list(&customer_principal(stranger.id), Some(owner.id))
        .await;
    assert!(matches!(foreign_list, Err(DomainError::Forbidden(_))));

    let staff_list = app
        .state
        .rentals
        .list(&employee(), Some(owner.id))
        .await
        .unwrap();
    assert_eq!(staff_list.len(), 1);
}

fn is_missing_location<T>(result: &Result<T, DomainError>) -> bool {
    matches!(result, Err(DomainError::NotFound { entity: "Location", value, .. }) if value.as_str() == "999")
}

#[tokio::test]
async fn unknown_locations_are_not_found() {
    let app = setup().await;
    let car = app.car("KDA 022A", 100).await;
    let customer = app.customer("Umi").await;
    let staff = employee();

    let branch = app
        .state
        .locations
        .create(
            NewLocation {
                name: "Westlands".to_string(),
                address: "Waiyaki Way".to_string(),
                contact_number: "+254711000000".to_string(),
                manager_name: None,
                opening_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                closing_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
            &admin(),
        )
        .await
        .unwrap();

    let booking = |pickup_location_id| NewReservation {
        car_id: car.id,
        customer_id: customer.id,
        pickup_date: t0() + Duration::days(1),
        return_date: t0() + Duration::days(2),
        pickup_location_id,
        return_location_id: None,
        advance_payment: None,
    };
    let reservation = app
        .state
        .reservations
        .create(booking(Some(999)), &customer_principal(customer.id))
        .await;
    assert!(is_missing_location(&reservation), "got {:?}", reservation);
    assert_eq!(app.reload_car(car.id).await.availability, CarAvailability::Available);

    let reservation = app
        .state
        .reservations
        .create(booking(Some(branch.id)), &customer_principal(customer.id))
        .await
        .unwrap();
    let amend = app
        .state
        .reservations
        .amend(
            reservation.id,
            ReservationChanges {
                return_location_id: Some(999),
                ..Default::default()
            },
            &staff,
        )
        .await;
    assert!(is_missing_location(&amend), "got {:?}", amend);

    let walk_in = app
        .state
        .rentals
        .create_direct(
            DirectRentalRequest {
                car_id: app.car("KDA 023A", 100).await.id,
                customer_id: customer.id,
                rental_start_date: t0() + Duration::hours(1),
                rental_end_date: t0() + Duration::days(1),
                pickup_location_id: Some(branch.id),
                return_location_id: Some(999),
            },
            &staff,
        )
        .await;
    assert!(is_missing_location(&walk_in), "got {:?}", walk_in);

    let parked = app
        .state
        .cars
        .create(
            NewCar {
                current_location_id: Some(999),
                ..common::new_car("KDA 024A", 100)
            },
            &admin(),
        )
        .await;
    assert!(is_missing_location(&parked), "got {:?}", parked);

    let moved = app
        .state
        .cars
        .update(
            car.id,
            CarChanges {
                current_location_id: Some(999),
                ..Default::default()
            },
            &admin(),
        )
        .await;
    assert!(is_missing_location(&moved), "got {:?}", moved);
}

#[tokio::test]
async fn handoff_carries_the_booking_deposit() {
    let app = setup().await;
    let car = app.car("KDA 025A", 100).await;
    let customer = app.customer("Wanjiru").await;
    let staff = employee();

    let start = t0() + Duration::hours(2);
    let reservation = app
        .state
        .reservations
        .create(
            NewReservation {
                car_id: car.id,
                customer_id: customer.id,
                pickup_date: start,
                return_date: start + Duration::days(2),
                pickup_location_id: None,
                return_location_id: None,
                advance_payment: Some(Decimal::from(50)),
            },
            &customer_principal(customer.id),
        )
        .await
        .unwrap();
    app.state
        .reservations
        .confirm(reservation.id, &staff)
        .await
        .unwrap();

    app.clock.set(start);
    let handoff = app
        .state
        .reservations
        .convert_to_rental(reservation.id, &staff)
        .await
        .unwrap();
    assert_eq!(handoff.advance_payment, Some(Decimal::from(50)));

    let rental = app
        .state
        .rentals
        .create_from_reservation(handoff.reservation_id, &staff)
        .await
        .unwrap();
    assert_eq!(handoff.amount_due(rental.total_amount), Decimal::from(150));
}
