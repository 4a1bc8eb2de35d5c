//! HTTP server for the string analyzer
//!
//! Builds the axum router and binds it, falling back through a list of
//! ports when the preferred one is unavailable.

use axum::{routing::get, Router};
use std::io::ErrorKind;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::handlers::{health, strings, AppState};

/// Creates the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/strings",
            get(strings::list_strings).post(strings::create_string),
        )
        // Static segment takes precedence over the {value} capture
        .route(
            "/strings/filter-by-natural-language",
            get(strings::filter_by_natural_language),
        )
        .route(
            "/strings/{value}",
            get(strings::get_string).delete(strings::delete_string),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the first available port among `ports`.
///
/// Only "address in use" and "permission denied" move on to the next port;
/// any other bind error is returned immediately.
pub async fn bind_with_fallback<I>(host: &str, ports: I) -> Result<TcpListener>
where
    I: IntoIterator<Item = u16>,
{
    let mut last_error = None;

    for port in ports {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if matches!(e.kind(), ErrorKind::AddrInUse | ErrorKind::PermissionDenied) => {
                warn!(port, error = %e, "Port unavailable, trying next");
                last_error = Some(e);
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }

    Err(Error::Io(last_error.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::AddrNotAvailable, "Failed to bind to any port")
    })))
}

/// Serves the API until Ctrl-C
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let ports = std::iter::once(config.port).chain(config.fallback_ports.iter().copied());
    let listener = bind_with_fallback(&config.host, ports).await?;

    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_falls_back_when_port_in_use() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let listener = bind_with_fallback("127.0.0.1", [taken_port, 0])
            .await
            .unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), taken_port);
    }

    #[tokio::test]
    async fn test_all_ports_taken_is_an_error() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let result = bind_with_fallback("127.0.0.1", [taken_port]).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
