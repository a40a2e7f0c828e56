//! HTTP surface - axum router over the relay context.

/// Door endpoint handlers
pub mod door;
/// Error to HTTP response mapping
pub mod error;

use crate::core::Relay;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Builds the router serving the four door endpoints.
pub fn router(relay: Relay) -> Router {
    Router::new()
        .route(
            "/door/command",
            get(door::get_command).post(door::set_command),
        )
        .route("/door/status", get(door::get_status).post(door::post_status))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}
