//! Thin HTTP surface over the analytics service.
//!
//! Routing, CORS, and request tracing only; all query logic lives in
//! [`crate::analytics`].

mod error;
mod handlers;
mod router;

pub use router::{create_router, Analytics, AppState};

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;

/// Bind and serve the API until ctrl-c.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
