//! Web server module for receiving tracking events.
//!
//! This module provides a thin web server that:
//! - Parses `/receive` payloads into raw records
//! - Enqueues them for the background consumer
//! - Acknowledges immediately, before any delivery happens

pub mod handlers;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, receive, AppState, HealthResponse};

/// Build the relay's HTTP routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/receive", any(receive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
