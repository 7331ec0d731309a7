//! Database models.

use lead_core::{Answer, Conversation, FollowUpSlot, QuestionSet, SubmitQuestion};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw `question_sets` row. Questions are stored as a JSON array.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct QuestionSetRow {
    pub organization_id: String,
    pub questions: String,
    pub created_at: String,
    pub updated_at: String,
}

impl QuestionSetRow {
    pub(crate) fn into_question_set(self) -> crate::Result<QuestionSet> {
        Ok(QuestionSet {
            organization_id: self.organization_id,
            questions: serde_json::from_str(&self.questions)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Raw `conversations` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ConversationRow {
    pub lead_id: String,
    pub rating: i64,
    pub status: String,
    pub message: String,
    pub overall_answer_score: i64,
    pub overall_lead_score: f64,
    pub submitted_count: i64,
    pub total_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ConversationRow {
    pub(crate) fn into_conversation(
        self,
        questions: Vec<Answer>,
        next_follow_up: Option<FollowUpSlot>,
    ) -> Conversation {
        Conversation {
            lead_id: self.lead_id,
            questions,
            rating: self.rating,
            status: self.status,
            message: self.message,
            overall_answer_score: self.overall_answer_score,
            submit_question: SubmitQuestion {
                submitted: self.submitted_count,
                total: self.total_count,
            },
            overall_lead_score: self.overall_lead_score,
            next_follow_up,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Raw `conversation_answers` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct AnswerRow {
    pub question_id: i64,
    pub answer: String,
    pub point: i64,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            question_id: row.question_id,
            answer: row.answer,
            point: row.point,
        }
    }
}

/// A follow-up reminder recorded with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FollowUp {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Lead the follow-up belongs to.
    pub lead_id: String,
    /// Follow-up date (`YYYY-MM-DD`), if given.
    pub next_follow_up_date: Option<String>,
    /// Follow-up time (`HH:MM`), if given.
    pub next_follow_up_time: Option<String>,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl FollowUp {
    /// Date/time pair as carried on a conversation.
    pub fn slot(&self) -> FollowUpSlot {
        FollowUpSlot {
            date: self.next_follow_up_date.clone(),
            time: self.next_follow_up_time.clone(),
        }
    }
}
