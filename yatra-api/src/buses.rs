use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use yatra_core::bus::{Bus, BusType, BusUpdate, NewBus};
use yatra_core::repository::BusQuery;

use crate::error::ApiError;
use crate::response::{created, ok, ok_list, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BusListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub bus_type: Option<BusType>,
    pub date: Option<NaiveDate>,
}

/// GET /api/bus — public search, departure time ascending.
pub async fn list_buses(
    State(state): State<AppState>,
    Query(params): Query<BusListParams>,
) -> Result<Json<ApiResponse<Vec<Bus>>>, ApiError> {
    let query = BusQuery {
        from: params.from,
        to: params.to,
        bus_type: params.bus_type,
        date: params.date,
    };
    let buses = state.buses.list(&query).await.map_err(ApiError::internal)?;
    Ok(ok_list(buses))
}

/// GET /api/bus/{id} — public.
pub async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Bus>>, ApiError> {
    let bus = state
        .buses
        .get(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Bus not found".into()))?;
    Ok(ok(bus))
}

/// POST /api/bus — admin.
pub async fn create_bus(
    State(state): State<AppState>,
    Json(spec): Json<NewBus>,
) -> Result<(StatusCode, Json<ApiResponse<Bus>>), ApiError> {
    let bus = Bus::new(spec)?;
    state
        .buses
        .create(&bus)
        .await
        .map_err(ApiError::internal)?;
    tracing::info!(bus_id = %bus.id, "bus created");
    Ok(created(bus))
}

/// PUT /api/bus/{id} — admin, partial update.
pub async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<BusUpdate>,
) -> Result<Json<ApiResponse<Bus>>, ApiError> {
    let mut bus = state
        .buses
        .get(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Bus not found".into()))?;
    update.apply(&mut bus)?;
    state
        .buses
        .update(&bus)
        .await
        .map_err(ApiError::internal)?;
    Ok(ok(bus))
}

/// DELETE /api/bus/{id} — admin.
pub async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = state
        .buses
        .delete(id)
        .await
        .map_err(ApiError::internal)?;
    if !deleted {
        return Err(ApiError::NotFound("Bus not found".into()));
    }
    Ok(ok(serde_json::json!({})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAdjustment {
    pub seats: u32,
    pub is_booking: bool,
}

/// PUT /api/bus/{id}/seats — authenticated direct inventory adjustment.
pub async fn update_bus_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SeatAdjustment>,
) -> Result<Json<ApiResponse<Bus>>, ApiError> {
    let bus = state.inventory.adjust(id, req.seats, req.is_booking).await?;
    Ok(ok(bus))
}
