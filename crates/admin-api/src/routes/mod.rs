//! Route handlers for the lead conversation API.

pub mod conversation;
pub mod dashboard;
pub mod health;
pub mod question_set;
pub mod summary;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Envelope returned by successful writes.
#[derive(Debug, Serialize)]
pub struct Saved<T> {
    pub message: &'static str,
    pub data: T,
}

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        .route("/lead/:lead_id/summary", get(summary::summary_page))
        // Health check
        .route("/health", get(health::health))
        // Question catalogs
        .route(
            "/question-set/:organization_id",
            get(question_set::get_question_set),
        )
        .route(
            "/create/question-set",
            post(question_set::upsert_question_set),
        )
        // Conversations
        .route(
            "/lead/conversation",
            get(conversation::list_conversations).post(conversation::submit_conversation),
        )
        .route(
            "/lead/conversation/:lead_id",
            get(conversation::get_conversation),
        )
        // API endpoints
        .route("/api/stats", get(dashboard::stats_api))
}
