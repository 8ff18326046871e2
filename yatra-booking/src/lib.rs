pub mod inventory;
pub mod service;

pub use inventory::InventoryService;
pub use service::{BookingService, CancellationOutcome, CancellationPolicy};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Bus not found")]
    BusNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Not authorized to access this booking")]
    Unauthorized,

    #[error("Not enough seats available")]
    InsufficientSeats,

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Refund not possible - too close to departure time")]
    RefundNotEligible,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<yatra_core::CoreError> for BookingError {
    fn from(err: yatra_core::CoreError) -> Self {
        match err {
            yatra_core::CoreError::ValidationError(msg) => BookingError::Validation(msg),
        }
    }
}
