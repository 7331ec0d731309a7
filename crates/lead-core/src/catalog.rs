//! Qualification question catalog.
//!
//! A catalog is an ordered list of [`Question`]s. Every organization may store
//! its own catalog; callers fall back to the built-in [`default_catalog`]
//! whenever none is stored (see [`resolve_catalog`]).

use serde::{Deserialize, Serialize};

use crate::slug::slug;

/// A multiple-choice option with a sentiment point value (-1, 0 or +1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Slug identifying the option within its question.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Sentiment point.
    pub point: i64,
}

impl QuestionOption {
    /// Create an option whose value is derived from the label.
    pub fn from_label(label: impl Into<String>, point: i64) -> Self {
        let label = label.into();
        Self {
            value: slug(&label),
            label,
            point,
        }
    }

    /// Change the label, re-deriving the value from it.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.value = slug(&self.label);
    }
}

/// A qualification question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the catalog and stable across edits.
    pub id: i64,
    /// Short title shown in the checklist.
    pub title: String,
    /// Full question text read to the lead.
    #[serde(rename = "questionText")]
    pub question_text: String,
    /// Ordered options.
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Look up an option by value.
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Point value of the option with the given value, if any.
    pub fn point_for(&self, value: &str) -> Option<i64> {
        self.option(value).map(|o| o.point)
    }
}

/// A stored organization question catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Owning organization.
    pub organization_id: String,
    /// Ordered questions.
    pub questions: Vec<Question>,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Last replacement timestamp.
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// An option as submitted when saving a catalog. The value may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub point: Option<i64>,
}

impl OptionDraft {
    /// The value this option will be stored with: the given value when
    /// non-blank, otherwise the slug of the label.
    pub fn resolved_value(&self) -> String {
        match self.value.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => slug(&self.label),
        }
    }
}

/// A question as submitted when saving a catalog. The id may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "questionText", default)]
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

/// Highest question id in a catalog, or 0 for an empty one.
pub fn max_question_id(questions: &[Question]) -> i64 {
    questions.iter().map(|q| q.id).max().unwrap_or(0)
}

/// Turn drafts into questions, assigning ids to drafts that lack one.
///
/// New ids start one past the larger of `high_water` and the highest id
/// already present in the drafts, and increase in list order. Drafts that
/// carry an id keep it. Option values are resolved with
/// [`OptionDraft::resolved_value`]; text fields are trimmed.
///
/// Returns `None` when a new id would overflow `i64`.
///
/// Drafts are expected to be validated already; a missing point becomes 0.
pub fn assign_question_ids(drafts: Vec<QuestionDraft>, high_water: i64) -> Option<Vec<Question>> {
    let existing = drafts.iter().filter_map(|d| d.id).max().unwrap_or(0);
    let mut next_id = existing.max(high_water);

    let mut questions = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let id = match draft.id {
            Some(id) => id,
            None => {
                next_id = next_id.checked_add(1)?;
                next_id
            }
        };

        let options = draft
            .options
            .iter()
            .map(|o| QuestionOption {
                value: o.resolved_value(),
                label: o.label.trim().to_string(),
                point: o.point.unwrap_or(0),
            })
            .collect();

        questions.push(Question {
            id,
            title: draft.title.trim().to_string(),
            question_text: draft.question_text.trim().to_string(),
            options,
        });
    }

    Some(questions)
}

/// Find a question by id.
pub fn find_question(catalog: &[Question], id: i64) -> Option<&Question> {
    catalog.iter().find(|q| q.id == id)
}

/// Pick the catalog a conversation runs against.
///
/// Returns the organization's catalog when one exists and is non-empty,
/// otherwise the default catalog. The two are never mixed.
pub fn resolve_catalog(organization: Option<Vec<Question>>) -> Vec<Question> {
    match organization {
        Some(questions) if !questions.is_empty() => questions,
        _ => default_catalog(),
    }
}

fn option(value: &str, label: &str, point: i64) -> QuestionOption {
    QuestionOption {
        value: value.to_string(),
        label: label.to_string(),
        point,
    }
}

fn question(id: i64, title: &str, text: &str, options: Vec<QuestionOption>) -> Question {
    Question {
        id,
        title: title.to_string(),
        question_text: text.to_string(),
        options,
    }
}

/// The built-in admissions qualification catalog.
pub fn default_catalog() -> Vec<Question> {
    vec![
        question(
            1,
            "Call Status",
            "What was the status of the call?",
            vec![
                option("call_continued", "Call continued", 1),
                option("busy", "Busy", 0),
                option("cut", "Call Cut / Disconnected", -1),
                option("call_later", "Asked to Call Later", 0),
            ],
        ),
        question(
            2,
            "Lead Confirmation",
            "The inquiry is for whom?",
            vec![
                option("self_confirmed", "Yes, Right Person (Self)", 1),
                option("different_person", "No, Different Person", -1),
                option("guardian", "Guardian / Parent", 1),
                option("not_sure", "Not Sure", -1),
            ],
        ),
        question(
            3,
            "Mode of Education",
            "Which mode of education is preferred?",
            vec![
                option("online", "Online", 1),
                option("offline", "Offline / Regular", 1),
                option("distance", "Distance Course", 1),
                option("not_decided", "Not Decided", 0),
            ],
        ),
        question(
            4,
            "Primary Requirement",
            "What is the student primarily looking for?",
            vec![
                option("placement_focused", "Placement-Focused Course", 1),
                option("campus_degree", "Campus-Based Degree", 1),
                option("exploring", "Still Exploring Options", 0),
                option("no_answer", "Did Not Answer Clearly", -1),
            ],
        ),
        question(
            5,
            "Budget Range",
            "What is the expected budget range?",
            vec![
                option("budget_2_4", "₹2 – 4 Lakh", 1),
                option("budget_4_8", "₹4 – 8 Lakh", 1),
                option("budget_10_plus", "₹10+ Lakh", 1),
                option("loan_required", "Need Education Loan", 0),
                option("prefer_not_say", "Prefer Not to Say", -1),
                option("joint_decision", "Joint Family Decision", 0),
            ],
        ),
        question(
            6,
            "Joining Timeline",
            "When is the student planning to join?",
            vec![
                option("waiting_result", "Waiting for Result", 0),
                option("immediate", "This Intake (0–30 Days)", 1),
                option("one_to_three", "Next 1 – 3 Months", 1),
                option("three_plus", "After 3+ Months", -1),
                option("not_sure", "Not Sure Yet", 0),
            ],
        ),
        question(
            7,
            "Relocation Preference",
            "What is the relocation preference?",
            vec![
                option("same_city", "Same City Only", 1),
                option("same_state", "Same State", 1),
                option("any_city", "Any City (Ready to Move)", 1),
                option("not_decided", "Not Decided", 0),
            ],
        ),
        question(
            8,
            "Hostel Requirement",
            "Does the student require hostel accommodation?",
            vec![
                option("hostel_yes", "Yes", 1),
                option("hostel_no", "No", 1),
                option("hostel_unsure", "Not Sure", 0),
            ],
        ),
        question(
            9,
            "Decision Authority",
            "Who will take the final admission decision?",
            vec![
                option("self", "Self", 1),
                option("parent", "Parent / Guardian", 1),
                option("joint", "Joint Decision", 0),
                option("not_decided", "Not Decided Yet", -1),
            ],
        ),
    ]
}
