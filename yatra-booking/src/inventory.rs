use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use yatra_core::bus::Bus;
use yatra_core::repository::BusRepository;

use crate::BookingError;

/// Direct seat-counter adjustment, the service behind
/// `PUT /api/bus/{id}/seats`. Reservations run as the repository's
/// conditional decrement; releases are capped at the trip's capacity.
pub struct InventoryService {
    buses: Arc<dyn BusRepository>,
}

impl InventoryService {
    pub fn new(buses: Arc<dyn BusRepository>) -> Self {
        Self { buses }
    }

    pub async fn adjust(
        &self,
        bus_id: Uuid,
        seats: u32,
        is_booking: bool,
    ) -> Result<Bus, BookingError> {
        if seats == 0 {
            return Err(BookingError::Validation(
                "Seat count must be positive".into(),
            ));
        }

        // Existence check up front so a missing trip is a 404, not a silent
        // no-op from the conditional update.
        self.buses
            .get(bus_id)
            .await?
            .ok_or(BookingError::BusNotFound)?;

        if is_booking {
            if !self.buses.reserve_seats(bus_id, seats).await? {
                return Err(BookingError::InsufficientSeats);
            }
        } else {
            self.buses.release_seats(bus_id, seats).await?;
        }

        let bus = self
            .buses
            .get(bus_id)
            .await?
            .ok_or(BookingError::BusNotFound)?;
        info!(
            bus_id = %bus_id,
            available_seats = bus.available_seats,
            is_booking,
            "seat inventory adjusted"
        );
        Ok(bus)
    }
}
