use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use yatra_booking::{BookingError, BookingService, CancellationPolicy};
use yatra_core::booking::{BookingStatus, PaymentMethod, PaymentStatus, RefundStatus};
use yatra_core::bus::{Bus, BusStatus, BusType, Operator};
use yatra_core::repository::{BookingRepository, BusRepository};
use yatra_core::user::{Actor, Role};
use yatra_store::{MemoryBookingRepository, MemoryBusRepository};

fn bus(price: i64, total: u32, available: u32, hours_to_departure: i64) -> Bus {
    let now = Utc::now();
    Bus {
        id: Uuid::new_v4(),
        operator: Operator {
            name: "SLTB".into(),
            contact: "+94 11 234 5678".into(),
        },
        bus_type: BusType::HighwayBus,
        from: "Colombo".into(),
        to: "Jaffna".into(),
        departure_time: now + Duration::hours(hours_to_departure),
        arrival_time: now + Duration::hours(hours_to_departure + 8),
        price,
        total_seats: total,
        available_seats: available,
        status: BusStatus::Scheduled,
        amenities: vec![],
        created_at: now,
        updated_at: now,
    }
}

fn user() -> Actor {
    Actor {
        user_id: Uuid::new_v4(),
        role: Role::User,
    }
}

async fn setup(
    b: &Bus,
    policy: CancellationPolicy,
) -> (Arc<MemoryBusRepository>, Arc<MemoryBookingRepository>, BookingService) {
    let buses = Arc::new(MemoryBusRepository::new());
    let bookings = Arc::new(MemoryBookingRepository::new());
    buses.create(b).await.unwrap();
    let service = BookingService::new(buses.clone(), bookings.clone(), policy);
    (buses, bookings, service)
}

#[tokio::test]
async fn book_then_cancel_with_full_refund() {
    let b = bus(1000, 40, 40, 26);
    let (buses, _, service) = setup(&b, CancellationPolicy::default()).await;
    let actor = user();

    let booking = service
        .create(&actor, b.id, vec![1, 2, 3], PaymentMethod::CreditCard)
        .await
        .unwrap();

    assert_eq!(booking.total_amount, 3000);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 37);

    let outcome = service.cancel(&actor, booking.id).await.unwrap();
    assert_eq!(outcome.refund_amount, 3000);
    assert_eq!(outcome.booking.status, BookingStatus::Cancelled);
    assert_eq!(outcome.booking.payment_status, PaymentStatus::Refunded);
    assert_eq!(outcome.booking.refund_status, RefundStatus::Approved);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 40);
}

#[tokio::test]
async fn half_refund_between_12_and_24_hours_out() {
    let b = bus(1000, 40, 40, 20);
    let (_, _, service) = setup(&b, CancellationPolicy::default()).await;
    let actor = user();

    let booking = service
        .create(&actor, b.id, vec![10, 11, 12], PaymentMethod::Cash)
        .await
        .unwrap();
    let outcome = service.cancel(&actor, booking.id).await.unwrap();
    assert_eq!(outcome.refund_amount, 1500);
}

#[tokio::test]
async fn zero_refund_rejects_and_keeps_booking_active_by_default() {
    let b = bus(1000, 40, 40, 5);
    let (buses, bookings, service) = setup(&b, CancellationPolicy::RejectAndKeepActive).await;
    let actor = user();

    let booking = service
        .create(&actor, b.id, vec![7, 8], PaymentMethod::DebitCard)
        .await
        .unwrap();

    let err = service.cancel(&actor, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::RefundNotEligible));

    // The booking keeps its seats and stays non-cancelled; only the refund
    // request is marked rejected.
    let stored = bookings.get(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.refund_status, RefundStatus::Rejected);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 38);
}

#[tokio::test]
async fn zero_refund_can_still_cancel_under_alternate_policy() {
    let b = bus(1000, 40, 40, 5);
    let (buses, _, service) = setup(&b, CancellationPolicy::CancelWithoutRefund).await;
    let actor = user();

    let booking = service
        .create(&actor, b.id, vec![7, 8], PaymentMethod::DebitCard)
        .await
        .unwrap();

    let outcome = service.cancel(&actor, booking.id).await.unwrap();
    assert_eq!(outcome.refund_amount, 0);
    assert_eq!(outcome.booking.status, BookingStatus::Cancelled);
    assert_eq!(outcome.booking.refund_status, RefundStatus::Rejected);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 40);
}

#[tokio::test]
async fn cancelling_twice_fails_and_mutates_nothing() {
    let b = bus(500, 40, 40, 30);
    let (buses, _, service) = setup(&b, CancellationPolicy::default()).await;
    let actor = user();

    let booking = service
        .create(&actor, b.id, vec![1], PaymentMethod::Cash)
        .await
        .unwrap();
    service.cancel(&actor, booking.id).await.unwrap();
    let seats_after_first = buses.get(b.id).await.unwrap().unwrap().available_seats;

    let err = service.cancel(&actor, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::AlreadyCancelled));
    assert_eq!(
        buses.get(b.id).await.unwrap().unwrap().available_seats,
        seats_after_first
    );
}

#[tokio::test]
async fn booking_more_seats_than_available_fails() {
    let b = bus(1000, 40, 2, 30);
    let (buses, _, service) = setup(&b, CancellationPolicy::default()).await;

    let err = service
        .create(&user(), b.id, vec![1, 2, 3], PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InsufficientSeats));
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 2);
}

#[tokio::test]
async fn booking_unknown_bus_fails() {
    let b = bus(1000, 40, 40, 30);
    let (_, _, service) = setup(&b, CancellationPolicy::default()).await;

    let err = service
        .create(&user(), Uuid::new_v4(), vec![1], PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::BusNotFound));
}

#[tokio::test]
async fn booking_with_no_seats_fails() {
    let b = bus(1000, 40, 40, 30);
    let (_, _, service) = setup(&b, CancellationPolicy::default()).await;

    let err = service
        .create(&user(), b.id, vec![], PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}

#[tokio::test]
async fn only_owner_or_admin_may_cancel_or_read() {
    let b = bus(1000, 40, 40, 30);
    let (_, _, service) = setup(&b, CancellationPolicy::default()).await;
    let owner = user();
    let stranger = user();
    let admin = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    };

    let booking = service
        .create(&owner, b.id, vec![1, 2], PaymentMethod::Cash)
        .await
        .unwrap();

    let err = service.get(&stranger, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Unauthorized));
    let err = service.cancel(&stranger, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::Unauthorized));

    assert!(service.get(&admin, booking.id).await.is_ok());
    assert!(service.cancel(&admin, booking.id).await.is_ok());
}

#[tokio::test]
async fn list_for_returns_only_own_bookings() {
    let b = bus(1000, 40, 40, 30);
    let (_, _, service) = setup(&b, CancellationPolicy::default()).await;
    let alice = user();
    let bob = user();

    service
        .create(&alice, b.id, vec![1], PaymentMethod::Cash)
        .await
        .unwrap();
    service
        .create(&bob, b.id, vec![2], PaymentMethod::Cash)
        .await
        .unwrap();

    let mine = service.list_for(&alice).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].user_id, alice.user_id);
    assert_eq!(service.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_bookings_never_over_commit_two_seats() {
    let b = bus(1000, 40, 2, 30);
    let (buses, _, service) = setup(&b, CancellationPolicy::default()).await;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let bus_id = b.id;
        handles.push(tokio::spawn(async move {
            service
                .create(&user(), bus_id, vec![1, 2], PaymentMethod::Cash)
                .await
        }));
    }

    let mut successes = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(BookingError::InsufficientSeats) => insufficient += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(insufficient, 1);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 0);
}

#[tokio::test]
async fn concurrent_bookings_fill_exactly_to_capacity() {
    // 8 requests of 2 seats against 10 available: exactly 5 can be satisfied.
    let b = bus(1000, 10, 10, 30);
    let (buses, _, service) = setup(&b, CancellationPolicy::default()).await;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let bus_id = b.id;
        handles.push(tokio::spawn(async move {
            service
                .create(&user(), bus_id, vec![1, 2], PaymentMethod::Cash)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(BookingError::InsufficientSeats) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(successes, 5);
    assert_eq!(buses.get(b.id).await.unwrap().unwrap().available_seats, 0);
}
