pub mod app_config;
pub mod booking_repo;
pub mod bus_repo;
pub mod database;
pub mod memory;
pub mod user_repo;

pub use booking_repo::PostgresBookingRepository;
pub use bus_repo::PostgresBusRepository;
pub use database::DbClient;
pub use memory::{MemoryBookingRepository, MemoryBusRepository, MemoryUserRepository};
pub use user_repo::PostgresUserRepository;
