//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub database: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = match ping_database(&state).await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            "unavailable"
        }
    };

    Json(Health {
        status: "ok".to_string(),
        database: database.to_string(),
    })
}

async fn ping_database(state: &AppState) -> database::Result<()> {
    database::question_set::count_question_sets(state.db.pool())
        .await
        .map(|_| ())
}
