use std::sync::Arc;

use yatra_booking::{BookingService, InventoryService};
use yatra_core::repository::{BusRepository, UserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub buses: Arc<dyn BusRepository>,
    pub bookings: Arc<BookingService>,
    pub inventory: Arc<InventoryService>,
    pub auth: AuthConfig,
}
