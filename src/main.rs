//! Life Clock - A state-managed HTTP server that counts down a number of years
//!
//! This is the main entry point for the life-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use life_clock::{
    config::Config,
    state::{AppState, CountdownController},
    api::create_router,
    services::{FileStorage, StateStore, SystemClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("life_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting life-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, state_file={}, key={}",
          config.host, config.port, config.state_file.display(), config.storage_key);

    // Restore the saved countdown, if any
    let storage = Arc::new(FileStorage::new(&config.state_file));
    let store = StateStore::new(storage, config.storage_key.clone());
    let controller = CountdownController::new(store, Arc::new(SystemClock));
    let snapshot = controller.resume()?;
    info!("Display: {} ({}, {})", snapshot.remaining_text, snapshot.status_text, snapshot.percent_text);

    let state = Arc::new(AppState::new(Arc::clone(&controller), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start a countdown {{\"years\": N}}");
    info!("  POST /reset  - Clear the countdown {{\"confirm\": true}}");
    info!("  GET  /status - Current display snapshot");
    info!("  GET  /events - Snapshot stream (server-sent events)");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    controller.shutdown()?;
    info!("Server shutdown complete");
    Ok(())
}
