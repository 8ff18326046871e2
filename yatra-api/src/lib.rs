use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod buses;
pub mod error;
pub mod middleware;
pub mod response;
pub mod state;

pub use state::AppState;

use crate::middleware::auth::{protect, require_admin};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/bus", get(buses::list_buses))
        .route("/api/bus/{id}", get(buses::get_bus));

    let user_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/api/bookings/{id}", get(bookings::get_booking))
        .route("/api/bookings/{id}/cancel", put(bookings::cancel_booking))
        .route("/api/bus/{id}/seats", put(buses::update_bus_seats))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), protect));

    let admin_routes = Router::new()
        .route("/api/bookings/admin", get(bookings::list_all_bookings))
        .route("/api/bus", post(buses::create_bus))
        .route(
            "/api/bus/{id}",
            put(buses::update_bus).delete(buses::delete_bus),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
