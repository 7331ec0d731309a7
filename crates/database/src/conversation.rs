//! Lead conversation persistence.
//!
//! Each lead has at most one conversation. Every submission overwrites the
//! summary fields (rating, note, scores, completion counts) and appends its
//! answers to the answer log; earlier answers are kept even when the same
//! question is answered again.

use lead_core::{Answer, Conversation, ConversationSubmission};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::follow_up::{insert_follow_up, latest_follow_up};
use crate::models::{AnswerRow, ConversationRow};
use crate::validation::{non_blank, validate_submission};

/// Record a submission for a lead.
///
/// Creates the conversation on first submit. Runs in a single transaction:
/// either the summary update, the appended answers and the follow-up are all
/// stored, or none of them are.
pub async fn submit_conversation(
    pool: &SqlitePool,
    submission: &ConversationSubmission,
) -> Result<Conversation> {
    validate_submission(submission)?;
    let lead_id = submission.lead_id.trim();
    let status = non_blank(&submission.status);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO conversations (
            lead_id, rating, status, message, overall_answer_score,
            overall_lead_score, submitted_count, total_count
        )
        VALUES (?, ?, COALESCE(?, 'open'), ?, ?, ?, ?, ?)
        ON CONFLICT(lead_id) DO UPDATE SET
            rating = excluded.rating,
            status = COALESCE(?, conversations.status),
            message = excluded.message,
            overall_answer_score = excluded.overall_answer_score,
            overall_lead_score = excluded.overall_lead_score,
            submitted_count = excluded.submitted_count,
            total_count = excluded.total_count,
            updated_at = datetime('now')
        "#,
    )
    .bind(lead_id)
    .bind(submission.rating)
    .bind(status)
    .bind(&submission.message)
    .bind(submission.overall_answer_score)
    .bind(submission.overall_lead_score)
    .bind(submission.submit_question.submitted)
    .bind(submission.submit_question.total)
    .bind(status)
    .execute(&mut *tx)
    .await?;

    for answer in &submission.questions {
        sqlx::query(
            r#"
            INSERT INTO conversation_answers (lead_id, question_id, answer, point)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(lead_id)
        .bind(answer.question_id)
        .bind(answer.answer.trim())
        .bind(answer.point)
        .execute(&mut *tx)
        .await?;
    }

    let date = non_blank(&submission.next_follow_up_date);
    let time = non_blank(&submission.next_follow_up_time);
    if date.is_some() || time.is_some() {
        let id = insert_follow_up(&mut *tx, lead_id, date, time).await?;
        tracing::debug!(lead_id, follow_up_id = id, "Follow-up recorded");
    }

    tx.commit().await?;

    tracing::info!(
        lead_id,
        answers = submission.questions.len(),
        overall_lead_score = submission.overall_lead_score,
        "Conversation saved"
    );

    get_conversation(pool, lead_id).await
}

/// Get a lead's conversation with its full answer log.
pub async fn get_conversation(pool: &SqlitePool, lead_id: &str) -> Result<Conversation> {
    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT lead_id, rating, status, message, overall_answer_score,
               overall_lead_score, submitted_count, total_count, created_at, updated_at
        FROM conversations
        WHERE lead_id = ?
        "#,
    )
    .bind(lead_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: lead_id.to_string(),
    })?;

    let answers = list_answers(pool, lead_id).await?;
    let follow_up = latest_follow_up(pool, lead_id).await?;

    Ok(row.into_conversation(answers, follow_up.map(|f| f.slot())))
}

/// List every conversation, most recently updated first.
pub async fn list_conversations(pool: &SqlitePool) -> Result<Vec<Conversation>> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT lead_id, rating, status, message, overall_answer_score,
               overall_lead_score, submitted_count, total_count, created_at, updated_at
        FROM conversations
        ORDER BY updated_at DESC, lead_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut conversations = Vec::with_capacity(rows.len());
    for row in rows {
        let answers = list_answers(pool, &row.lead_id).await?;
        let follow_up = latest_follow_up(pool, &row.lead_id).await?;
        conversations.push(row.into_conversation(answers, follow_up.map(|f| f.slot())));
    }

    Ok(conversations)
}

/// A lead's answer log in submission order.
pub async fn list_answers(pool: &SqlitePool, lead_id: &str) -> Result<Vec<Answer>> {
    let rows = sqlx::query_as::<_, AnswerRow>(
        r#"
        SELECT question_id, answer, point
        FROM conversation_answers
        WHERE lead_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(lead_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Answer::from).collect())
}

/// Count conversations.
pub async fn count_conversations(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM conversations
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Stored composite lead score of every conversation.
pub async fn list_lead_scores(pool: &SqlitePool) -> Result<Vec<f64>> {
    let scores = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT overall_lead_score FROM conversations
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(scores)
}
