//! services/streaks/src/bin/streaks.rs

use streaks_lib::{
    adapters::PgHabitStore,
    config::Config,
    error::ApiError,
    scheduler::{RecomputeScheduler, SchedulerConfig},
    service::{RecomputeSettings, StreakService},
    web::{rest::ApiDoc, router, state::AppState},
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting streaks service...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgHabitStore::new(db_pool));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Recompute Service ---
    let service = Arc::new(StreakService::new(
        store,
        RecomputeSettings {
            entry_window: config.entry_window,
            page_size: config.page_size,
            concurrency: config.concurrency,
        },
    ));

    // --- 4. Start the Scheduler ---
    let shutdown = CancellationToken::new();
    let scheduler_handle = RecomputeScheduler::new(
        service.clone(),
        SchedulerConfig {
            interval: config.recompute_interval,
            enabled: config.scheduler_enabled,
        },
    )
    .start(shutdown.clone());

    // --- 5. Create the Web Router ---
    let app_state = Arc::new(AppState {
        service,
        config: config.clone(),
    });
    let app = Router::new()
        .merge(router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = scheduler_handle.await {
        error!("Scheduler task ended abnormally: {}", e);
    }
    info!("Streaks service stopped.");
    Ok(())
}
