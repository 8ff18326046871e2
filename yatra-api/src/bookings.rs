use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatra_core::booking::{Booking, PaymentMethod};
use yatra_core::user::Actor;

use crate::error::ApiError;
use crate::response::{created, ok, ok_list, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub bus_id: Uuid,
    pub seats: Vec<u32>,
    pub payment_method: PaymentMethod,
}

/// A booking plus its derived human-facing reference code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub booking_reference: String,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        let booking_reference = booking.reference();
        Self {
            booking,
            booking_reference,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationData {
    pub booking: BookingView,
    pub refund_amount: i64,
}

/// GET /api/bookings — the caller's bookings, newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<BookingView>>>, ApiError> {
    let bookings = state.bookings.list_for(&actor).await?;
    Ok(ok_list(bookings.into_iter().map(BookingView::from).collect()))
}

/// GET /api/bookings/admin — every booking, admin only.
pub async fn list_all_bookings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BookingView>>>, ApiError> {
    let bookings = state.bookings.list_all().await?;
    Ok(ok_list(bookings.into_iter().map(BookingView::from).collect()))
}

/// GET /api/bookings/{id} — owner or admin.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let booking = state.bookings.get(&actor, id).await?;
    Ok(ok(booking.into()))
}

/// POST /api/bookings — create per the reservation saga.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingView>>), ApiError> {
    let booking = state
        .bookings
        .create(&actor, req.bus_id, req.seats, req.payment_method)
        .await?;
    Ok(created(booking.into()))
}

/// PUT /api/bookings/{id}/cancel — owner or admin.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CancellationData>>, ApiError> {
    let outcome = state.bookings.cancel(&actor, id).await?;
    Ok(ok(CancellationData {
        booking: outcome.booking.into(),
        refund_amount: outcome.refund_amount,
    }))
}
