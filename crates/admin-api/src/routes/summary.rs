//! Per-lead conversation summary page.

use askama::Template;
use axum::extract::{Path, Query, State};
use lead_core::{default_catalog, find_question, LeadStatus, Question};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Optional catalog used to label answers.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub organization_id: Option<String>,
}

/// Summary page template.
#[derive(Template)]
#[template(path = "summary.html")]
pub struct SummaryTemplate {
    pub lead_id: String,
    pub status: String,
    pub band: &'static str,
    pub color: &'static str,
    pub lead_score: String,
    pub answer_score: i64,
    pub submitted: i64,
    pub total: i64,
    pub rating: i64,
    pub message: String,
    pub follow_up: String,
    pub answers: Vec<AnswerLine>,
}

/// One answered question on the summary page.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerLine {
    pub title: String,
    pub answer: String,
    pub point: i64,
}

/// Render a lead's stored conversation.
///
/// Scores come from the stored snapshot; the catalog only supplies labels.
pub async fn summary_page(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<SummaryTemplate> {
    let pool = state.db.pool();
    let conversation = database::conversation::get_conversation(pool, &lead_id).await?;

    let catalog = match query.organization_id.as_deref().map(str::trim) {
        Some(org) if !org.is_empty() => match database::question_set::catalog_for(pool, org).await {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(organization_id = %org, error = %err, "Falling back to default catalog");
                default_catalog()
            }
        },
        _ => default_catalog(),
    };

    let answers = conversation
        .latest_entries()
        .into_iter()
        .map(|a| answer_line(&catalog, a.question_id, &a.answer, a.point))
        .collect();

    let band = LeadStatus::from_score(conversation.overall_lead_score);
    let follow_up = conversation
        .next_follow_up
        .as_ref()
        .map(|slot| {
            [slot.date.as_deref(), slot.time.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Ok(SummaryTemplate {
        band: band.label(),
        color: band.color(),
        lead_score: format!("{:.2}", conversation.overall_lead_score),
        answer_score: conversation.overall_answer_score,
        submitted: conversation.submit_question.submitted,
        total: conversation.submit_question.total,
        rating: conversation.rating,
        message: conversation.message,
        status: conversation.status,
        lead_id: conversation.lead_id,
        follow_up,
        answers,
    })
}

fn answer_line(catalog: &[Question], question_id: i64, value: &str, point: i64) -> AnswerLine {
    match find_question(catalog, question_id) {
        Some(question) => AnswerLine {
            title: question.title.clone(),
            answer: question
                .option(value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| value.to_string()),
            point,
        },
        None => AnswerLine {
            title: format!("Question {}", question_id),
            answer: value.to_string(),
            point,
        },
    }
}
