//! Lead conversation routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use lead_core::{Conversation, ConversationSubmission};

use super::Saved;
use crate::error::Result;
use crate::state::AppState;

/// Fetch one lead's conversation.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> Result<Json<Conversation>> {
    let conversation = database::conversation::get_conversation(state.db.pool(), &lead_id).await?;
    Ok(Json(conversation))
}

/// List every stored conversation.
pub async fn list_conversations(State(state): State<AppState>) -> Result<Json<Vec<Conversation>>> {
    let conversations = database::conversation::list_conversations(state.db.pool()).await?;
    Ok(Json(conversations))
}

/// Record a submission, creating the conversation on first call.
pub async fn submit_conversation(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ConversationSubmission>, JsonRejection>,
) -> Result<Json<Saved<Conversation>>> {
    let Json(submission) = payload?;
    let conversation =
        database::conversation::submit_conversation(state.db.pool(), &submission).await?;

    Ok(Json(Saved {
        message: "Conversation saved successfully.",
        data: conversation,
    }))
}
