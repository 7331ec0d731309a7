//! Input validation for question sets and conversation submissions.

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use lead_core::{ConversationSubmission, QuestionDraft, MAX_RATING};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Identifier with characters outside `[A-Za-z0-9_-]`.
    InvalidIdentifier { field: String, value: String },
    /// Question with fewer than two options.
    TooFewOptions { question: String, count: usize },
    /// Option point outside -1..=1.
    InvalidPoint { question: String, point: i64 },
    /// Two options of one question share a value.
    DuplicateOptionValue { question: String, value: String },
    /// Two questions share an id.
    DuplicateQuestionId(i64),
    /// Question id outside `1..=MAX_QUESTION_ID`.
    InvalidQuestionId(i64),
    /// No question id left to assign.
    QuestionIdOverflow,
    /// Rating outside 0..=5.
    InvalidRating(i64),
    /// Submitted count negative or larger than the total.
    InvalidSubmitCount { submitted: i64, total: i64 },
    /// Lead score outside 0..=100 or not finite.
    InvalidLeadScore(String),
    /// Follow-up date not in `YYYY-MM-DD` form.
    InvalidDate(String),
    /// Follow-up time not in `HH:MM` form.
    InvalidTime(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} is required", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidIdentifier { field, value } => {
                write!(f, "Invalid {}: {:?}", field, value)
            }
            ValidationError::TooFewOptions { question, count } => write!(
                f,
                "Each question must have at least 2 options ({:?} has {})",
                question, count
            ),
            ValidationError::InvalidPoint { question, point } => write!(
                f,
                "Option point must be -1, 0 or 1 ({:?} has {})",
                question, point
            ),
            ValidationError::DuplicateOptionValue { question, value } => write!(
                f,
                "Duplicate option value {:?} in question {:?}",
                value, question
            ),
            ValidationError::DuplicateQuestionId(id) => write!(f, "Duplicate question id {}", id),
            ValidationError::InvalidQuestionId(id) => write!(
                f,
                "Question id must be between 1 and {}, got {}",
                MAX_QUESTION_ID, id
            ),
            ValidationError::QuestionIdOverflow => write!(f, "No question id left to assign"),
            ValidationError::InvalidRating(rating) => {
                write!(f, "Rating must be between 0 and {}, got {}", MAX_RATING, rating)
            }
            ValidationError::InvalidSubmitCount { submitted, total } => write!(
                f,
                "Invalid submitQuestion: {} submitted of {} total",
                submitted, total
            ),
            ValidationError::InvalidLeadScore(score) => {
                write!(f, "Lead score must be between 0 and 100, got {}", score)
            }
            ValidationError::InvalidDate(value) => {
                write!(f, "Invalid follow-up date {:?} (expected YYYY-MM-DD)", value)
            }
            ValidationError::InvalidTime(value) => {
                write!(f, "Invalid follow-up time {:?} (expected HH:MM)", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Highest question id accepted from callers.
pub const MAX_QUESTION_ID: i64 = i32::MAX as i64;

/// Maximum allowed length for organization and lead ids.
pub const MAX_ID_LENGTH: usize = 64;

/// Maximum allowed length for question titles and texts.
pub const MAX_QUESTION_LENGTH: usize = 500;

/// Maximum allowed length for conversation notes.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Validate an organization or lead identifier.
///
/// Identifiers must be non-empty, at most [`MAX_ID_LENGTH`] characters and
/// consist of ASCII letters, digits, `-` and `_`.
pub fn validate_identifier(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
            actual: value.len(),
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual: value.chars().count(),
        });
    }

    Ok(())
}

/// Validate a question set before it replaces the stored one.
pub fn validate_question_set(
    organization_id: &str,
    questions: &[QuestionDraft],
) -> Result<(), ValidationError> {
    validate_identifier("organization_id", organization_id)?;

    if questions.is_empty() {
        return Err(ValidationError::Empty("questions".to_string()));
    }

    let mut ids = HashSet::new();
    for question in questions {
        validate_text("title", &question.title, MAX_QUESTION_LENGTH)?;
        validate_text("questionText", &question.question_text, MAX_QUESTION_LENGTH)?;

        if let Some(id) = question.id {
            if !(1..=MAX_QUESTION_ID).contains(&id) {
                return Err(ValidationError::InvalidQuestionId(id));
            }
            if !ids.insert(id) {
                return Err(ValidationError::DuplicateQuestionId(id));
            }
        }

        let title = question.title.trim().to_string();
        if question.options.len() < 2 {
            return Err(ValidationError::TooFewOptions {
                question: title,
                count: question.options.len(),
            });
        }

        let mut values = HashSet::new();
        for option in &question.options {
            validate_text("option label", &option.label, MAX_QUESTION_LENGTH)?;

            let point = option
                .point
                .ok_or_else(|| ValidationError::Empty("option point".to_string()))?;
            if !(-1..=1).contains(&point) {
                return Err(ValidationError::InvalidPoint {
                    question: title,
                    point,
                });
            }

            let value = option.resolved_value();
            if value.is_empty() {
                return Err(ValidationError::Empty("option value".to_string()));
            }
            if !values.insert(value.clone()) {
                return Err(ValidationError::DuplicateOptionValue {
                    question: title,
                    value,
                });
            }
        }
    }

    Ok(())
}

/// Validate a follow-up date in `YYYY-MM-DD` form.
pub fn validate_follow_up_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Validate a follow-up time in `HH:MM` form.
pub fn validate_follow_up_time(time: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidTime(time.to_string()))
}

/// Validate a conversation submission before it is persisted.
pub fn validate_submission(submission: &ConversationSubmission) -> Result<(), ValidationError> {
    validate_identifier("lead_id", &submission.lead_id)?;

    if submission.questions.is_empty() {
        return Err(ValidationError::Empty("questions".to_string()));
    }

    for answer in &submission.questions {
        if !(1..=MAX_QUESTION_ID).contains(&answer.question_id) {
            return Err(ValidationError::InvalidQuestionId(answer.question_id));
        }
        if !(-1..=1).contains(&answer.point) {
            return Err(ValidationError::InvalidPoint {
                question: format!("question {}", answer.question_id),
                point: answer.point,
            });
        }
    }

    if !(0..=i64::from(MAX_RATING)).contains(&submission.rating) {
        return Err(ValidationError::InvalidRating(submission.rating));
    }

    let counts = submission.submit_question;
    if counts.submitted < 0 || counts.total < 0 || counts.submitted > counts.total {
        return Err(ValidationError::InvalidSubmitCount {
            submitted: counts.submitted,
            total: counts.total,
        });
    }

    let score = submission.overall_lead_score;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(ValidationError::InvalidLeadScore(score.to_string()));
    }

    if submission.message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_MESSAGE_LENGTH,
            actual: submission.message.chars().count(),
        });
    }

    if let Some(date) = non_blank(&submission.next_follow_up_date) {
        validate_follow_up_date(date)?;
    }
    if let Some(time) = non_blank(&submission.next_follow_up_time) {
        validate_follow_up_time(time)?;
    }

    Ok(())
}

/// Trimmed value when present and non-empty.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
