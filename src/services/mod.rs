//! # Service HTTP Surfaces
//!
//! The axum routers for the user and product services, plus the listener
//! plumbing shared by every service binary.

pub mod products;
pub mod users;

use axum::Router;
use tokio::signal;
use tracing::info;

use crate::core::config::ServerSettings;
use crate::core::error::{ServiceError, ServiceResult};

/// Bind the listener and run a service until a shutdown signal arrives
pub async fn serve(app: Router, settings: &ServerSettings) -> ServiceResult<()> {
    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::internal(format!("Server error: {}", e)))
}

/// Resolve when Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("📡 Received Ctrl+C, shutting down"),
        _ = terminate => info!("📡 Received SIGTERM, shutting down"),
    }
}
