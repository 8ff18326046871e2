//! In-memory repository implementations, used by the test suites and for
//! running the API without a database. The seat-inventory operations hold the
//! map lock across the check and the write, giving the same atomicity as the
//! conditional UPDATE in the Postgres implementation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use yatra_core::booking::Booking;
use yatra_core::bus::Bus;
use yatra_core::repository::{
    BookingRepository, BusQuery, BusRepository, RepoResult, UserRepository,
};
use yatra_core::user::User;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct MemoryBusRepository {
    buses: Mutex<HashMap<Uuid, Bus>>,
}

impl MemoryBusRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusRepository for MemoryBusRepository {
    async fn create(&self, bus: &Bus) -> RepoResult<()> {
        lock(&self.buses).insert(bus.id, bus.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Bus>> {
        Ok(lock(&self.buses).get(&id).cloned())
    }

    async fn list(&self, query: &BusQuery) -> RepoResult<Vec<Bus>> {
        let mut buses: Vec<Bus> = lock(&self.buses)
            .values()
            .filter(|bus| {
                query.from.as_deref().is_none_or(|f| bus.from == f)
                    && query.to.as_deref().is_none_or(|t| bus.to == t)
                    && query.bus_type.is_none_or(|bt| bus.bus_type == bt)
                    && query
                        .date
                        .is_none_or(|d| bus.departure_time.date_naive() == d)
            })
            .cloned()
            .collect();
        buses.sort_by_key(|bus| bus.departure_time);
        Ok(buses)
    }

    async fn update(&self, bus: &Bus) -> RepoResult<()> {
        lock(&self.buses).insert(bus.id, bus.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        Ok(lock(&self.buses).remove(&id).is_some())
    }

    async fn reserve_seats(&self, id: Uuid, count: u32) -> RepoResult<bool> {
        let mut buses = lock(&self.buses);
        let Some(bus) = buses.get_mut(&id) else {
            return Ok(false);
        };
        if bus.available_seats < count {
            return Ok(false);
        }
        bus.available_seats -= count;
        bus.updated_at = chrono::Utc::now();
        Ok(true)
    }

    async fn release_seats(&self, id: Uuid, count: u32) -> RepoResult<()> {
        let mut buses = lock(&self.buses);
        if let Some(bus) = buses.get_mut(&id) {
            bus.available_seats = (bus.available_seats + count).min(bus.total_seats);
            bus.updated_at = chrono::Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn create(&self, booking: &Booking) -> RepoResult<()> {
        lock(&self.bookings).insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(lock(&self.bookings).get(&id).cloned())
    }

    async fn update(&self, booking: &Booking) -> RepoResult<()> {
        lock(&self.bookings).insert(booking.id, booking.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = lock(&self.bookings)
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_all(&self) -> RepoResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = lock(&self.bookings).values().cloned().collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> RepoResult<()> {
        lock(&self.users).insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(lock(&self.users).get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(lock(&self.users)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}
