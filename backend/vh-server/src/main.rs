use vh_server::error::ServerError;
use vh_server::{AppState, build_router, logger};

use std::error::Error;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;
use vh_supervisor::LifecycleCoordinator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Development convenience; absence is fine
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let settings = vh_config::Settings::load()?;
    settings.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(
        settings.logging.level,
        settings.logging.file.clone(),
        settings.logging.colored,
    )?;

    info!("Starting vh-server v{}", env!("CARGO_PKG_VERSION"));
    settings.log_summary();

    // Truncates the game and update logs
    let coordinator = LifecycleCoordinator::from_settings(&settings)?;
    let state = AppState::new(coordinator);
    let coordinator = Arc::clone(&state.coordinator);

    let app = build_router(state);

    let bind_addr = settings.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server drained");

    if let Err(e) = coordinator.shutdown().await {
        error!("Failed to stop game server on exit: {e}");
        return Err(ServerError::from(e).into());
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
