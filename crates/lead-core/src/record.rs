//! Conversation records and submission payloads.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

/// A recorded answer. `point` is a snapshot taken when the answer was
/// submitted and is never recomputed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(deserialize_with = "question_id")]
    pub question_id: i64,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub point: i64,
}

/// Accepts the question id as a number or as a numeric string.
fn question_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid question_id: {:?}", s))),
    }
}

/// Completion counts at submit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQuestion {
    pub submitted: i64,
    pub total: i64,
}

/// Next follow-up date (`YYYY-MM-DD`) and time (`HH:MM`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpSlot {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl FollowUpSlot {
    /// True when neither a date nor a time is set.
    pub fn is_empty(&self) -> bool {
        blank(&self.date) && blank(&self.time)
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Payload that creates or appends to a lead's conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSubmission {
    #[serde(default)]
    pub lead_id: String,
    #[serde(default)]
    pub questions: Vec<Answer>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub next_follow_up_date: Option<String>,
    #[serde(default)]
    pub next_follow_up_time: Option<String>,
    #[serde(rename = "overallAnswerScore", default)]
    pub overall_answer_score: i64,
    #[serde(rename = "overallLeadScore", default)]
    pub overall_lead_score: f64,
    #[serde(rename = "submitQuestion", default)]
    pub submit_question: SubmitQuestion,
}

impl ConversationSubmission {
    /// Follow-up slot carried by this submission.
    pub fn follow_up(&self) -> FollowUpSlot {
        FollowUpSlot {
            date: self.next_follow_up_date.clone(),
            time: self.next_follow_up_time.clone(),
        }
    }
}

/// A lead's conversation record.
///
/// `questions` is an append-only log: every submission adds its answers, so a
/// question may appear more than once. The latest entry for a question is
/// its current answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub lead_id: String,
    pub questions: Vec<Answer>,
    pub rating: i64,
    pub status: String,
    pub message: String,
    #[serde(rename = "overallAnswerScore")]
    pub overall_answer_score: i64,
    #[serde(rename = "submitQuestion")]
    pub submit_question: SubmitQuestion,
    #[serde(rename = "overallLeadScore")]
    pub overall_lead_score: f64,
    #[serde(default)]
    pub next_follow_up: Option<FollowUpSlot>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Conversation {
    /// Latest entry per question, in order of first appearance.
    pub fn latest_entries(&self) -> Vec<&Answer> {
        let mut order: Vec<i64> = Vec::new();
        let mut latest: HashMap<i64, &Answer> = HashMap::new();

        for answer in &self.questions {
            if latest.insert(answer.question_id, answer).is_none() {
                order.push(answer.question_id);
            }
        }

        order.into_iter().filter_map(|id| latest.get(&id).copied()).collect()
    }

    /// Current answer value per question id.
    pub fn latest_answers(&self) -> BTreeMap<i64, String> {
        self.latest_entries()
            .into_iter()
            .map(|a| (a.question_id, a.answer.clone()))
            .collect()
    }
}
