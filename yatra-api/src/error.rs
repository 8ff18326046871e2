use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use yatra_booking::BookingError;
use yatra_core::CoreError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    InternalServerError(String),
}

impl ApiError {
    /// Wraps a storage-layer failure; the detail is logged, not exposed.
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::BusNotFound | BookingError::BookingNotFound => {
                ApiError::NotFound(err.to_string())
            }
            BookingError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            BookingError::InsufficientSeats
            | BookingError::AlreadyCancelled
            | BookingError::RefundNotEligible
            | BookingError::Validation(_) => ApiError::BadRequest(err.to_string()),
            BookingError::Storage(e) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
