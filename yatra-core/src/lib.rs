pub mod booking;
pub mod bus;
pub mod refund;
pub mod repository;
pub mod user;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
