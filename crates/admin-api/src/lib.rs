//! REST API and admin pages for lead qualification conversations.
//!
//! Serves the question-set and conversation JSON endpoints consumed by the
//! caller dashboard, plus a server-rendered overview and per-lead summary.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use crate::config::Config;
pub use crate::error::ApiError;
pub use crate::state::AppState;

/// Build the application with state and request tracing attached.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
