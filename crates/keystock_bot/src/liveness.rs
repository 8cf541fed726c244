//! HTTP liveness endpoint for external uptime monitors.

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Body returned by `GET /`.
pub const LIVENESS_BODY: &str = "Bot is alive!";

/// Creates the liveness router.
pub fn create_router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    LIVENESS_BODY
}

/// Bind the liveness listener on all interfaces.
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port)).await
}

/// Serve the liveness endpoint until the process exits.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Liveness endpoint listening");
    }
    axum::serve(listener, create_router()).await
}
