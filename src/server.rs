//! HTTP server initialization and runtime setup.
//!
//! Opens the store, builds the services and runs the Axum server until a
//! shutdown signal arrives.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::persistence::JsonFileEntryRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::web::session;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - JSON file store (empty if the file is missing or corrupt)
/// - Session signing key
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The store file exists but cannot be read
/// - The session secret is unusable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = Arc::new(
        JsonFileEntryRepository::open(&config.store_path)
            .await
            .with_context(|| format!("Failed to open store {}", config.store_path.display()))?,
    );
    let link_service = Arc::new(LinkService::new(repository));
    tracing::info!(
        "Store ready at {} ({} entries)",
        config.store_path.display(),
        link_service.count().await?
    );

    let session_key = match &config.session_secret {
        Some(secret) => session::key_from_secret(secret.as_bytes()),
        None => session::generate_key(),
    }
    .context("Failed to initialise session key")?;

    let state = AppState::new(link_service, config.base_url.clone(), session_key);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl+C (or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
