//! REST API for carbon-intensity slot selection.
//!
//! Provides one GET endpoint:
//! - `/slots`: lowest-intensity slots for `duration` minutes, optionally
//!   restricted to a single `contiguous` slot

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::SelectionConfig;
use crate::forecast::ForecastProvider;

pub use crate::slots::{CarbonReading, SlotRecord};
pub use types::{ErrorResponse, SlotsQuery, parse_flag};

/// Application state shared across all request handlers.
///
/// Read-only after startup and wrapped in `Arc`; each request fetches its
/// own forecast, so no locks are needed.
pub struct AppState {
    /// Source of forecast data.
    pub provider: ForecastProvider,
    /// Defaults for omitted request parameters.
    pub defaults: SelectionConfig,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/slots", get(handlers::get_slots))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
