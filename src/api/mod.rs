//! HTTP API server module
//!
//! REST endpoints for the React client plus a WebSocket stream of
//! notifications.

pub mod auth;
pub mod handlers;
mod routes;
pub mod ws;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::Notifier;
use crate::store::Store;

pub use auth::{CurrentUser, SessionStore};
pub use routes::create_router;

/// Shared application state for HTTP handlers
pub struct AppState {
    pub store: Store,
    /// Persists notifications and fans them out to WebSocket clients
    pub notifier: Notifier,
    /// Active login sessions (in-memory, cleared on restart)
    pub sessions: SessionStore,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        Self {
            store,
            notifier: Notifier::default(),
            sessions: SessionStore::default(),
            config,
        }
    }
}

/// Router with CORS and request tracing applied
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP API server and serve until the process stops.
///
/// SECURITY: binding to a non-loopback host exposes the server to the network.
pub async fn start_server(state: Arc<AppState>) -> AppResult<()> {
    let server = &state.config.server;
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| AppError::config(format!("Invalid server address: {}", e)))?;

    if !server.is_loopback() {
        tracing::warn!("Server binding to {} - accessible from network", server.host);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP API server listening on http://{}", addr);

    axum::serve(listener, build_app(state))
        .await
        .map_err(|e| AppError::unknown(format!("HTTP server error: {}", e)))
}
