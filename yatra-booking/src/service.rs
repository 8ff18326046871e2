use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use yatra_core::booking::{Booking, BookingStatus, PaymentMethod};
use yatra_core::refund::refund_for;
use yatra_core::repository::{BookingRepository, BusRepository};
use yatra_core::user::Actor;

use crate::BookingError;

/// What happens to a cancellation request when the refund policy yields
/// nothing. The default reproduces the historical behavior: the refund is
/// rejected and the booking stays active with its seats. The alternative
/// cancels anyway with a zero refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancellationPolicy {
    #[default]
    RejectAndKeepActive,
    CancelWithoutRefund,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationOutcome {
    pub booking: Booking,
    pub refund_amount: i64,
}

/// Drives the booking lifecycle against the trip and booking stores. Seat
/// inventory is only ever touched through the repository's atomic
/// reserve/release operations.
pub struct BookingService {
    buses: Arc<dyn BusRepository>,
    bookings: Arc<dyn BookingRepository>,
    policy: CancellationPolicy,
}

impl BookingService {
    pub fn new(
        buses: Arc<dyn BusRepository>,
        bookings: Arc<dyn BookingRepository>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            buses,
            bookings,
            policy,
        }
    }

    /// Books seats on a trip. The seat reservation runs first as a single
    /// conditional decrement; only then is the booking row written. A failed
    /// write compensates by releasing the seats again, so the two steps
    /// behave as one unit and inventory is never left over-committed.
    pub async fn create(
        &self,
        actor: &Actor,
        bus_id: Uuid,
        seats: Vec<u32>,
        payment_method: PaymentMethod,
    ) -> Result<Booking, BookingError> {
        if seats.is_empty() {
            return Err(BookingError::Validation(
                "Seat numbers are required".into(),
            ));
        }

        let bus = self
            .buses
            .get(bus_id)
            .await?
            .ok_or(BookingError::BusNotFound)?;

        let count = seats.len() as u32;
        if !self.buses.reserve_seats(bus_id, count).await? {
            return Err(BookingError::InsufficientSeats);
        }

        let booking = Booking::new(actor.user_id, bus_id, seats, bus.price, payment_method);
        if let Err(err) = self.bookings.create(&booking).await {
            warn!(
                booking_id = %booking.id,
                bus_id = %bus_id,
                "booking write failed, releasing {} reserved seats",
                count
            );
            if let Err(release_err) = self.buses.release_seats(bus_id, count).await {
                warn!(bus_id = %bus_id, "seat release compensation failed: {}", release_err);
            }
            return Err(err.into());
        }

        info!(
            booking_id = %booking.id,
            reference = %booking.reference(),
            bus_id = %bus_id,
            seats = count,
            total_amount = booking.total_amount,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancels a booking on behalf of its owner or an admin, applying the
    /// refund policy against the trip's departure time. Seats go back to the
    /// trip only on paths that actually cancel.
    pub async fn cancel(
        &self,
        actor: &Actor,
        booking_id: Uuid,
    ) -> Result<CancellationOutcome, BookingError> {
        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if !actor.can_access(booking.user_id) {
            return Err(BookingError::Unauthorized);
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }

        let bus = self
            .buses
            .get(booking.bus_id)
            .await?
            .ok_or(BookingError::BusNotFound)?;

        let refund_amount = refund_for(booking.total_amount, bus.departure_time, Utc::now());

        if refund_amount > 0 {
            booking.cancel_with_refund(refund_amount);
            self.bookings.update(&booking).await?;
            self.buses
                .release_seats(bus.id, booking.seats.len() as u32)
                .await?;
            info!(
                booking_id = %booking.id,
                refund_amount,
                "booking cancelled with refund"
            );
            return Ok(CancellationOutcome {
                booking,
                refund_amount,
            });
        }

        match self.policy {
            CancellationPolicy::RejectAndKeepActive => {
                booking.reject_refund(false);
                self.bookings.update(&booking).await?;
                info!(booking_id = %booking.id, "refund rejected, booking left active");
                Err(BookingError::RefundNotEligible)
            }
            CancellationPolicy::CancelWithoutRefund => {
                booking.reject_refund(true);
                self.bookings.update(&booking).await?;
                self.buses
                    .release_seats(bus.id, booking.seats.len() as u32)
                    .await?;
                info!(booking_id = %booking.id, "booking cancelled without refund");
                Ok(CancellationOutcome {
                    booking,
                    refund_amount: 0,
                })
            }
        }
    }

    /// Fetch a booking, enforcing the owner-or-admin rule.
    pub async fn get(&self, actor: &Actor, booking_id: Uuid) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;
        if !actor.can_access(booking.user_id) {
            return Err(BookingError::Unauthorized);
        }
        Ok(booking)
    }

    /// The caller's own bookings, newest first.
    pub async fn list_for(&self, actor: &Actor) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.list_for_user(actor.user_id).await?)
    }

    /// Every booking, newest first. Admin gating happens at the boundary.
    pub async fn list_all(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.list_all().await?)
    }
}
