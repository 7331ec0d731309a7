//! Error types for wizard operations.

use thiserror::Error;

/// Errors returned by [`crate::Wizard`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Random-access navigation before the conversation was started or has history.
    #[error("navigation is locked until the conversation is started")]
    NavigationLocked,

    /// Jump target past the summary step.
    #[error("step {target} is out of range (last step is {max})")]
    OutOfRange { target: usize, max: usize },

    /// Question id not present in the catalog.
    #[error("unknown question: {0}")]
    UnknownQuestion(i64),

    /// Option value not present on the question.
    #[error("question {question_id} has no option '{value}'")]
    UnknownOption { question_id: i64, value: String },

    /// Rating outside 0..=5.
    #[error("rating must be between 0 and 5, got {0}")]
    InvalidRating(u8),

    /// Lead id missing when building a submission.
    #[error("lead id is required")]
    MissingLeadId,

    /// No answers recorded yet.
    #[error("at least one question must be answered before submitting")]
    NothingToSubmit,

    /// The conversation was already submitted.
    #[error("conversation already submitted")]
    AlreadySubmitted,
}
