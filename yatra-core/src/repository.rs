use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::booking::Booking;
use crate::bus::{Bus, BusType};
use crate::user::User;

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Search filter for trip listings. `date` selects the departure day.
#[derive(Debug, Clone, Default)]
pub struct BusQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub bus_type: Option<BusType>,
    pub date: Option<NaiveDate>,
}

/// Trip storage, including the seat-inventory contract. `reserve_seats` and
/// `release_seats` are the only operations allowed to change
/// `available_seats`, and both must apply as a single atomic update so
/// concurrent callers can never drive the counter below zero or above
/// `total_seats`.
#[async_trait]
pub trait BusRepository: Send + Sync {
    async fn create(&self, bus: &Bus) -> RepoResult<()>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<Bus>>;

    /// Filtered listing, departure time ascending.
    async fn list(&self, query: &BusQuery) -> RepoResult<Vec<Bus>>;

    async fn update(&self, bus: &Bus) -> RepoResult<()>;

    /// Returns false when the trip did not exist.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Conditional decrement: succeeds (true) only when `available_seats`
    /// covers `count` at the moment of the update.
    async fn reserve_seats(&self, id: Uuid, count: u32) -> RepoResult<bool>;

    /// Atomic increment, capped at `total_seats`.
    async fn release_seats(&self, id: Uuid, count: u32) -> RepoResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> RepoResult<()>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>>;

    async fn update(&self, booking: &Booking) -> RepoResult<()>;

    /// A user's bookings, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Booking>>;

    /// Every booking in the system, newest first (admin listing).
    async fn list_all(&self) -> RepoResult<Vec<Booking>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> RepoResult<()>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}
