//! Question catalog routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use database::QuestionSet;
use lead_core::QuestionDraft;
use serde::Deserialize;

use super::Saved;
use crate::error::Result;
use crate::state::AppState;

/// Body of `POST /create/question-set`.
#[derive(Debug, Deserialize)]
pub struct UpsertQuestionSetRequest {
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

/// Fetch an organization's stored catalog.
pub async fn get_question_set(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<Json<QuestionSet>> {
    let set = database::question_set::get_question_set(state.db.pool(), &organization_id).await?;
    Ok(Json(set))
}

/// Create or replace an organization's catalog.
pub async fn upsert_question_set(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpsertQuestionSetRequest>, JsonRejection>,
) -> Result<Json<Saved<QuestionSet>>> {
    let Json(request) = payload?;
    let set = database::question_set::upsert_question_set(
        state.db.pool(),
        &request.organization_id,
        request.questions,
    )
    .await?;

    Ok(Json(Saved {
        message: "Question set saved successfully.",
        data: set,
    }))
}
