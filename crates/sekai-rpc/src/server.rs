//! HTTP server implementation using Axum.

use crate::handler::{handle_health, handle_rpc};
use axum::{
    routing::{get, post},
    Router,
};
use sekai_core::{QueueNotifier, RepositoryManager, RepositorySettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Upper bound on RPC requests handled at once.
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Application state shared across handlers.
pub struct AppState {
    /// Repository cache and character index
    pub manager: RepositoryManager,
    /// Load-failure notifications waiting for `get_notifications`
    pub notifications: Arc<QueueNotifier>,
    /// Current repository list
    pub settings: RwLock<RepositorySettings>,
    /// Where `reload_repositories` persists a replaced repository list
    pub settings_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        manager: RepositoryManager,
        notifications: Arc<QueueNotifier>,
        settings: RepositorySettings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        Self {
            manager,
            notifications,
            settings: RwLock::new(settings),
            settings_path,
        }
    }
}

/// Build the router serving `/health` and `/rpc`.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/rpc", post(handle_rpc))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the JSON-RPC HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let app = build_router(Arc::new(state));

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Bind to the address
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    // Spawn the server in the background
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
