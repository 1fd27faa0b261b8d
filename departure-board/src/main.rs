use std::sync::Arc;

use departure_board::board::DepartureBoard;
use departure_board::config::BoardConfig;
use departure_board::departures::SystemClock;
use departure_board::schedules::{JsonFileSource, ScheduleSnapshot, ScheduleSource};
use departure_board::sessions::SessionManager;
use departure_board::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Pick the schedule source: read per request, or an in-memory snapshot
    let file_source = JsonFileSource::new(&config.schedules_path);
    let source: Arc<dyn ScheduleSource> = match config.reload_interval() {
        None => {
            info!(path = %file_source.path().display(), "reading schedules on every request");
            Arc::new(file_source)
        }
        Some(period) => {
            let snapshot = match ScheduleSnapshot::from_source(file_source) {
                Ok(snapshot) => Arc::new(snapshot),
                Err(e) => {
                    error!(error = %e, "failed to load schedules");
                    std::process::exit(1);
                }
            };
            info!(count = snapshot.len(), ?period, "loaded schedule snapshot");

            // Spawn background task to reload the snapshot
            let snapshot_refresh = Arc::clone(&snapshot);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.tick().await; // First tick is immediate, skip it
                loop {
                    interval.tick().await;
                    match snapshot_refresh.refresh() {
                        Ok(count) => info!(count, "reloaded schedules"),
                        Err(e) => warn!(error = %e, "failed to reload schedules, keeping previous"),
                    }
                }
            });

            snapshot
        }
    };

    let clock = SystemClock::new(config.utc_offset());
    let offset = clock.offset();
    let board = DepartureBoard::new(source, Arc::new(clock));
    let sessions = Arc::new(SessionManager::new(board.clone(), config.tick_interval()));

    let state = AppState::new(board, Arc::clone(&sessions));
    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %config.addr, %offset, "departure board listening");
    info!("  GET  /health          - Health check");
    info!("  GET  /next-departure  - Ranked departures");
    info!("  GET  /ws              - Live departures (WebSocket)");
    info!("  GET  /                - Live departures (WebSocket upgrade) or static assets");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
    }

    sessions.shutdown().await;
    info!("shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
