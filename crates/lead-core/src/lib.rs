//! Core types and logic for lead qualification conversations.
//!
//! This crate has no I/O. It provides:
//!
//! - [`Question`] / [`QuestionOption`] - the qualification catalog, with the
//!   built-in [`default_catalog`] and organization overrides via [`resolve_catalog`]
//! - [`Wizard`] - the step state machine a caller walks through during a call
//! - [`scoring`] - answer-sentiment and composite lead score calculation
//! - [`LeadStatus`] - ordinal bands over the composite score
//! - [`Conversation`] / [`ConversationSubmission`] - the persisted record and
//!   the payload that appends to it
//!
//! # Example
//!
//! ```rust
//! use lead_core::{default_catalog, Step, Wizard};
//!
//! let mut wizard = Wizard::new(default_catalog());
//! assert_eq!(wizard.start(), Step::Question(0));
//!
//! wizard.select(1, "call_continued").unwrap();
//! wizard.set_rating(4).unwrap();
//!
//! let submission = wizard.submission("lead-1").unwrap();
//! assert_eq!(submission.overall_answer_score, 1);
//! ```

mod catalog;
mod error;
mod record;
pub mod scoring;
mod slug;
mod status;
mod wizard;

pub use catalog::{
    assign_question_ids, default_catalog, find_question, max_question_id, resolve_catalog,
    OptionDraft, Question, QuestionDraft, QuestionOption, QuestionSet,
};
pub use error::WizardError;
pub use record::{Answer, Conversation, ConversationSubmission, FollowUpSlot, SubmitQuestion};
pub use scoring::{LeadScore, MAX_RATING};
pub use slug::slug;
pub use status::LeadStatus;
pub use wizard::{can_navigate, QuestionState, Step, Wizard};
