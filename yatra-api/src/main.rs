use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yatra_api::{app, state::AuthConfig, AppState};
use yatra_booking::{BookingService, CancellationPolicy, InventoryService};
use yatra_store::{
    DbClient, PostgresBookingRepository, PostgresBusRepository, PostgresUserRepository,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatra_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = yatra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Yatra API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let buses = Arc::new(PostgresBusRepository::new(db.pool.clone()));
    let bookings = Arc::new(PostgresBookingRepository::new(db.pool.clone()));
    let users = Arc::new(PostgresUserRepository::new(db.pool.clone()));

    let policy = if config.business_rules.cancel_on_zero_refund {
        CancellationPolicy::CancelWithoutRefund
    } else {
        CancellationPolicy::RejectAndKeepActive
    };

    let app_state = AppState {
        users,
        buses: buses.clone(),
        bookings: Arc::new(BookingService::new(buses.clone(), bookings, policy)),
        inventory: Arc::new(InventoryService::new(buses)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
