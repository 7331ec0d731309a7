//! Conversation wizard.
//!
//! A caller walks through `NotStarted -> Question(0..N-1) -> Note -> Summary`
//! and finally submits. Steps are addressed by index: `0..N-1` are the
//! catalog questions, `N` is the note step and `N+1` the summary step.
//!
//! Navigation is not gated by completion. Once the conversation is started,
//! or as soon as any answer exists, the caller may [`Wizard::jump`] to any
//! step, skip questions and come back to them later.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{find_question, Question};
use crate::error::WizardError;
use crate::record::{Answer, Conversation, ConversationSubmission, FollowUpSlot, SubmitQuestion};
use crate::scoring::{self, LeadScore, MAX_RATING};

/// The step the wizard is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    NotStarted,
    /// Catalog question at this index.
    Question(usize),
    Note,
    Summary,
    Submitted,
}

/// Checklist classification of a question. Display only; never blocks navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionState {
    Answered,
    /// Unanswered, but a later question has an answer.
    Skipped,
    Pending,
}

/// Whether random-access navigation is allowed.
pub fn can_navigate(has_history: bool, started: bool) -> bool {
    has_history || started
}

/// Step state machine for a single lead conversation.
#[derive(Debug, Clone)]
pub struct Wizard {
    catalog: Vec<Question>,
    answers: BTreeMap<i64, String>,
    /// Points recorded with resumed answers, kept until the answer changes.
    snapshots: BTreeMap<i64, i64>,
    note: String,
    rating: u8,
    follow_up: FollowUpSlot,
    started: bool,
    submitted: bool,
    index: usize,
}

impl Wizard {
    /// Fresh conversation over a catalog.
    pub fn new(catalog: Vec<Question>) -> Self {
        Self {
            catalog,
            answers: BTreeMap::new(),
            snapshots: BTreeMap::new(),
            note: String::new(),
            rating: 0,
            follow_up: FollowUpSlot::default(),
            started: false,
            submitted: false,
            index: 0,
        }
    }

    /// Resume from a persisted conversation.
    ///
    /// Answers (latest entry per question), note and rating are restored.
    /// Restored answers keep their recorded point until they are changed, so
    /// later catalog edits do not rescore them.
    /// Answers to questions missing from the catalog are dropped and an
    /// out-of-range rating reads as unrated. With any answer restored the
    /// wizard starts out navigable at the first question.
    pub fn resume(catalog: Vec<Question>, conversation: &Conversation) -> Self {
        let mut wizard = Self::new(catalog);

        for entry in conversation.latest_entries() {
            if entry.answer.is_empty()
                || find_question(&wizard.catalog, entry.question_id).is_none()
            {
                continue;
            }
            wizard
                .answers
                .insert(entry.question_id, entry.answer.clone());
            wizard.snapshots.insert(entry.question_id, entry.point);
        }
        wizard.note = conversation.message.clone();
        wizard.rating = u8::try_from(conversation.rating)
            .ok()
            .filter(|r| *r <= MAX_RATING)
            .unwrap_or(0);
        wizard.started = wizard.has_history();

        wizard
    }

    pub fn catalog(&self) -> &[Question] {
        &self.catalog
    }

    pub fn answers(&self) -> &BTreeMap<i64, String> {
        &self.answers
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn follow_up(&self) -> &FollowUpSlot {
        &self.follow_up
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Number of catalog questions.
    pub fn total(&self) -> usize {
        self.catalog.len()
    }

    /// Index of the note step.
    pub fn note_index(&self) -> usize {
        self.catalog.len()
    }

    /// Index of the summary step.
    pub fn summary_index(&self) -> usize {
        self.catalog.len() + 1
    }

    /// Current step.
    pub fn step(&self) -> Step {
        if self.submitted {
            Step::Submitted
        } else if !self.started {
            Step::NotStarted
        } else {
            self.step_at(self.index)
        }
    }

    fn step_at(&self, index: usize) -> Step {
        match index {
            i if i < self.note_index() => Step::Question(i),
            i if i == self.note_index() => Step::Note,
            _ => Step::Summary,
        }
    }

    /// The question on screen, if the current step is a question.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step() {
            Step::Question(i) => self.catalog.get(i),
            _ => None,
        }
    }

    /// Leave `NotStarted`. Goes to the first question, or straight to the
    /// note step when resuming with history or when the catalog is empty.
    pub fn start(&mut self) -> Step {
        if !self.started && !self.submitted {
            self.started = true;
            self.index = if self.has_history() || self.catalog.is_empty() {
                self.note_index()
            } else {
                0
            };
        }
        self.step()
    }

    /// Move forward one step. No-op on the summary step.
    pub fn next(&mut self) -> Step {
        if self.started && !self.submitted && self.index < self.summary_index() {
            self.index += 1;
        }
        self.step()
    }

    /// Move back one step. No-op on the first step.
    pub fn previous(&mut self) -> Step {
        if self.started && !self.submitted && self.index > 0 {
            self.index -= 1;
        }
        self.step()
    }

    /// Random-access move to any step index in `[0, N+1]`.
    pub fn jump(&mut self, target: usize) -> Result<Step, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if !can_navigate(self.has_history(), self.started) {
            return Err(WizardError::NavigationLocked);
        }
        if target > self.summary_index() {
            return Err(WizardError::OutOfRange {
                target,
                max: self.summary_index(),
            });
        }

        self.started = true;
        self.index = target;
        Ok(self.step())
    }

    /// Record or overwrite the answer to a question. An empty value clears it.
    /// Does not move the wizard.
    pub fn select(&mut self, question_id: i64, value: &str) -> Result<(), WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let question =
            find_question(&self.catalog, question_id).ok_or(WizardError::UnknownQuestion(question_id))?;

        if value.is_empty() {
            self.answers.remove(&question_id);
            self.snapshots.remove(&question_id);
            return Ok(());
        }
        let unchanged = self.answers.get(&question_id).is_some_and(|v| v == value);
        if unchanged && self.snapshots.contains_key(&question_id) {
            // Restored answer, possibly to an option the catalog no longer offers.
            return Ok(());
        }
        if question.option(value).is_none() {
            return Err(WizardError::UnknownOption {
                question_id,
                value: value.to_string(),
            });
        }

        if !unchanged {
            self.snapshots.remove(&question_id);
        }
        self.answers.insert(question_id, value.to_string());
        Ok(())
    }

    /// Remove the answer to a question.
    pub fn clear(&mut self, question_id: i64) {
        if !self.submitted {
            self.answers.remove(&question_id);
            self.snapshots.remove(&question_id);
        }
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Set the satisfaction rating, 0 (unrated) to 5.
    pub fn set_rating(&mut self, rating: u8) -> Result<(), WizardError> {
        if rating > MAX_RATING {
            return Err(WizardError::InvalidRating(rating));
        }
        self.rating = rating;
        Ok(())
    }

    pub fn set_follow_up(&mut self, date: Option<String>, time: Option<String>) {
        self.follow_up = FollowUpSlot { date, time };
    }

    /// Catalog questions with a non-empty answer.
    pub fn answered_count(&self) -> usize {
        self.catalog
            .iter()
            .filter(|q| self.answers.get(&q.id).is_some_and(|v| !v.is_empty()))
            .count()
    }

    /// `round(100 * answered / N)`, 0 for an empty catalog.
    pub fn progress_percentage(&self) -> u8 {
        if self.catalog.is_empty() {
            return 0;
        }
        (100.0 * self.answered_count() as f64 / self.catalog.len() as f64).round() as u8
    }

    pub fn has_history(&self) -> bool {
        self.answered_count() > 0
    }

    fn is_answered(&self, question: &Question) -> bool {
        self.answers.get(&question.id).is_some_and(|v| !v.is_empty())
    }

    /// Highest catalog index holding an answer.
    pub fn max_answered_index(&self) -> Option<usize> {
        self.catalog.iter().rposition(|q| self.is_answered(q))
    }

    /// Checklist state of the question at a catalog index.
    pub fn question_state(&self, index: usize) -> Option<QuestionState> {
        let question = self.catalog.get(index)?;
        if self.is_answered(question) {
            return Some(QuestionState::Answered);
        }
        match self.max_answered_index() {
            Some(max) if index < max => Some(QuestionState::Skipped),
            _ => Some(QuestionState::Pending),
        }
    }

    /// Checklist state of every catalog question, in order.
    pub fn question_states(&self) -> Vec<QuestionState> {
        (0..self.catalog.len())
            .filter_map(|i| self.question_state(i))
            .collect()
    }

    /// Point an answer contributes: the recorded point for a restored answer,
    /// otherwise the catalog's current point for the option.
    fn point_of(&self, question: &Question, value: &str) -> i64 {
        match self.snapshots.get(&question.id) {
            Some(point) => *point,
            None => question.point_for(value).unwrap_or(0),
        }
    }

    /// Scores for the current answers and rating.
    pub fn score(&self) -> LeadScore {
        let overall_answer_score = self
            .catalog
            .iter()
            .filter_map(|q| {
                let value = self.answers.get(&q.id).filter(|v| !v.is_empty())?;
                Some(self.point_of(q, value))
            })
            .sum();
        let submitted = self.answered_count();
        let total = self.catalog.len();

        LeadScore {
            overall_answer_score,
            overall_lead_score: scoring::overall_lead_score(
                submitted,
                total,
                self.rating,
                overall_answer_score,
            ),
            submitted,
            total,
        }
    }

    /// Build the payload that persists this conversation.
    ///
    /// Answers are listed in catalog order with their point snapshot. Restored
    /// answers carry the point they were recorded with.
    pub fn submission(&self, lead_id: &str) -> Result<ConversationSubmission, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if lead_id.trim().is_empty() {
            return Err(WizardError::MissingLeadId);
        }

        let questions: Vec<Answer> = self
            .catalog
            .iter()
            .filter_map(|q| {
                let value = self.answers.get(&q.id).filter(|v| !v.is_empty())?;
                Some(Answer {
                    question_id: q.id,
                    answer: value.clone(),
                    point: self.point_of(q, value),
                })
            })
            .collect();

        if questions.is_empty() {
            return Err(WizardError::NothingToSubmit);
        }

        let score = self.score();

        Ok(ConversationSubmission {
            lead_id: lead_id.trim().to_string(),
            questions,
            message: self.note.clone(),
            rating: i64::from(self.rating),
            status: None,
            next_follow_up_date: self.follow_up.date.clone(),
            next_follow_up_time: self.follow_up.time.clone(),
            overall_answer_score: score.overall_answer_score,
            overall_lead_score: score.overall_lead_score,
            submit_question: SubmitQuestion {
                submitted: score.submitted as i64,
                total: score.total as i64,
            },
        })
    }

    /// Mark the conversation as persisted. Call only after a successful submit.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn conversation(answers: &[(i64, &str, i64)], rating: i64) -> Conversation {
        Conversation {
            lead_id: "L1".to_string(),
            questions: answers
                .iter()
                .map(|(id, value, point)| Answer {
                    question_id: *id,
                    answer: value.to_string(),
                    point: *point,
                })
                .collect(),
            rating,
            status: "open".to_string(),
            message: "call back after exams".to_string(),
            overall_answer_score: 0,
            submit_question: SubmitQuestion::default(),
            overall_lead_score: 0.0,
            next_follow_up: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_fresh_wizard_not_started() {
        let wizard = Wizard::new(default_catalog());
        assert_eq!(wizard.step(), Step::NotStarted);
        assert!(!wizard.has_history());
        assert_eq!(wizard.progress_percentage(), 0);
        assert_eq!(wizard.note_index(), 9);
        assert_eq!(wizard.summary_index(), 10);
    }

    #[test]
    fn test_linear_walk() {
        let mut wizard = Wizard::new(default_catalog());
        assert_eq!(wizard.start(), Step::Question(0));
        assert_eq!(wizard.current_question().unwrap().id, 1);

        for i in 1..9 {
            assert_eq!(wizard.next(), Step::Question(i));
        }
        assert_eq!(wizard.next(), Step::Note);
        assert_eq!(wizard.next(), Step::Summary);
        // Terminal for forward navigation.
        assert_eq!(wizard.next(), Step::Summary);

        assert_eq!(wizard.previous(), Step::Note);
        assert_eq!(wizard.previous(), Step::Question(8));
    }

    #[test]
    fn test_previous_at_first_question_is_noop() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        assert_eq!(wizard.previous(), Step::Question(0));
        assert_eq!(wizard.step(), Step::Question(0));
    }

    #[test]
    fn test_next_before_start_is_noop() {
        let mut wizard = Wizard::new(default_catalog());
        assert_eq!(wizard.next(), Step::NotStarted);
        assert_eq!(wizard.previous(), Step::NotStarted);
    }

    #[test]
    fn test_jump_locked_without_history() {
        let mut wizard = Wizard::new(default_catalog());
        assert_eq!(wizard.jump(3), Err(WizardError::NavigationLocked));
        assert_eq!(wizard.step(), Step::NotStarted);
    }

    #[test]
    fn test_jump_to_summary_with_history() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.select(1, "busy").unwrap();
        assert_eq!(wizard.step(), Step::NotStarted);

        assert_eq!(wizard.jump(10), Ok(Step::Summary));
        assert!(wizard.is_started());
    }

    #[test]
    fn test_jump_anywhere_once_started() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        assert_eq!(wizard.jump(6), Ok(Step::Question(6)));
        assert_eq!(wizard.jump(9), Ok(Step::Note));
        assert_eq!(wizard.jump(2), Ok(Step::Question(2)));
        assert_eq!(
            wizard.jump(11),
            Err(WizardError::OutOfRange {
                target: 11,
                max: 10
            })
        );
        assert_eq!(wizard.step(), Step::Question(2));
    }

    #[test]
    fn test_select_does_not_advance() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        wizard.select(1, "call_continued").unwrap();
        assert_eq!(wizard.step(), Step::Question(0));

        // Overwrite.
        wizard.select(1, "cut").unwrap();
        assert_eq!(wizard.answers().get(&1).map(String::as_str), Some("cut"));

        // Clear with an empty value.
        wizard.select(1, "").unwrap();
        assert!(wizard.answers().is_empty());
    }

    #[test]
    fn test_select_rejects_unknown() {
        let mut wizard = Wizard::new(default_catalog());
        assert_eq!(
            wizard.select(99, "busy"),
            Err(WizardError::UnknownQuestion(99))
        );
        assert_eq!(
            wizard.select(1, "maybe"),
            Err(WizardError::UnknownOption {
                question_id: 1,
                value: "maybe".to_string()
            })
        );
    }

    #[test]
    fn test_skipped_classification() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        wizard.select(1, "call_continued").unwrap();
        wizard.jump(4).unwrap();
        wizard.select(5, "budget_4_8").unwrap();

        let states = wizard.question_states();
        assert_eq!(states[0], QuestionState::Answered);
        assert_eq!(states[1], QuestionState::Skipped);
        assert_eq!(states[3], QuestionState::Skipped);
        assert_eq!(states[4], QuestionState::Answered);
        assert_eq!(states[5], QuestionState::Pending);
        assert_eq!(wizard.max_answered_index(), Some(4));

        // Answering a skipped question clears its flag.
        wizard.select(2, "guardian").unwrap();
        assert_eq!(wizard.question_state(1), Some(QuestionState::Answered));
        assert_eq!(wizard.question_state(42), None);
    }

    #[test]
    fn test_progress() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.select(1, "busy").unwrap();
        assert_eq!(wizard.answered_count(), 1);
        assert_eq!(wizard.progress_percentage(), 11);

        wizard.select(2, "guardian").unwrap();
        assert_eq!(wizard.progress_percentage(), 22);
        assert!(wizard.has_history());
    }

    #[test]
    fn test_start_with_history_goes_to_note() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.select(3, "online").unwrap();
        assert_eq!(wizard.start(), Step::Note);
    }

    #[test]
    fn test_empty_catalog() {
        let mut wizard = Wizard::new(Vec::new());
        assert_eq!(wizard.start(), Step::Note);
        assert_eq!(wizard.next(), Step::Summary);
        assert_eq!(wizard.progress_percentage(), 0);
        assert_eq!(wizard.submission("L1"), Err(WizardError::NothingToSubmit));
    }

    #[test]
    fn test_rating_bounds() {
        let mut wizard = Wizard::new(default_catalog());
        assert!(wizard.set_rating(5).is_ok());
        assert_eq!(wizard.set_rating(6), Err(WizardError::InvalidRating(6)));
        assert_eq!(wizard.rating(), 5);
    }

    #[test]
    fn test_resume_from_conversation() {
        let convo = conversation(
            &[
                (1, "busy", 0),
                (2, "guardian", 1),
                (1, "call_continued", 1),
                (77, "retired", 1),
            ],
            4,
        );
        let wizard = Wizard::resume(default_catalog(), &convo);

        assert!(wizard.is_started());
        assert!(wizard.has_history());
        assert_eq!(wizard.step(), Step::Question(0));
        assert_eq!(wizard.answered_count(), 2);
        assert_eq!(
            wizard.answers().get(&1).map(String::as_str),
            Some("call_continued")
        );
        assert!(!wizard.answers().contains_key(&77));
        assert_eq!(wizard.rating(), 4);
        assert_eq!(wizard.note(), "call back after exams");
    }

    #[test]
    fn test_resume_bad_rating_reads_unrated() {
        let convo = conversation(&[(1, "busy", 0)], 9);
        let wizard = Wizard::resume(default_catalog(), &convo);
        assert_eq!(wizard.rating(), 0);
    }

    #[test]
    fn test_resume_keeps_recorded_points() {
        let convo = conversation(&[(1, "call_continued", 1), (2, "guardian", 1)], 3);

        // Catalog edited after the answers were recorded.
        let mut catalog = default_catalog();
        for option in catalog[0].options.iter_mut() {
            if option.value == "call_continued" {
                option.point = -1;
            }
        }

        let wizard = Wizard::resume(catalog, &convo);
        assert_eq!(wizard.score().overall_answer_score, 2);

        let submission = wizard.submission("L1").unwrap();
        assert_eq!(submission.questions[0].point, 1);
        assert_eq!(submission.questions[1].point, 1);
        assert_eq!(submission.overall_answer_score, 2);
    }

    #[test]
    fn test_resume_retired_option_until_changed() {
        let convo = conversation(&[(1, "no_longer_offered", -1)], 0);
        let mut wizard = Wizard::resume(default_catalog(), &convo);

        // Re-selecting the restored value is accepted and keeps its point.
        assert_eq!(wizard.select(1, "no_longer_offered"), Ok(()));
        let submission = wizard.submission("L1").unwrap();
        assert_eq!(submission.questions[0].answer, "no_longer_offered");
        assert_eq!(submission.questions[0].point, -1);

        // A changed answer is scored from the catalog again.
        wizard.select(1, "busy").unwrap();
        assert_eq!(wizard.submission("L1").unwrap().questions[0].point, 0);
        assert!(matches!(
            wizard.select(1, "no_longer_offered"),
            Err(WizardError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_submission_snapshots_points() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        wizard.select(3, "online").unwrap();
        wizard.select(1, "call_continued").unwrap();
        wizard.select(2, "guardian").unwrap();
        wizard.set_rating(5).unwrap();
        wizard.set_note("interested in MBA");
        wizard.set_follow_up(Some("2026-11-02".to_string()), Some("10:30".to_string()));

        let submission = wizard.submission(" L1 ").unwrap();
        assert_eq!(submission.lead_id, "L1");
        let ids: Vec<i64> = submission.questions.iter().map(|a| a.question_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(submission.questions.iter().all(|a| a.point == 1));
        assert_eq!(submission.overall_answer_score, 3);
        assert_eq!(submission.overall_lead_score, 73.33);
        assert_eq!(
            submission.submit_question,
            SubmitQuestion {
                submitted: 3,
                total: 9
            }
        );
        assert_eq!(submission.rating, 5);
        assert_eq!(submission.message, "interested in MBA");
        assert_eq!(submission.next_follow_up_date.as_deref(), Some("2026-11-02"));
    }

    #[test]
    fn test_submission_requires_lead_and_answers() {
        let mut wizard = Wizard::new(default_catalog());
        assert_eq!(wizard.submission("L1"), Err(WizardError::NothingToSubmit));
        wizard.select(1, "busy").unwrap();
        assert_eq!(wizard.submission("  "), Err(WizardError::MissingLeadId));
    }

    #[test]
    fn test_submitted_is_terminal() {
        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        wizard.select(1, "busy").unwrap();
        wizard.mark_submitted();

        assert_eq!(wizard.step(), Step::Submitted);
        assert_eq!(wizard.next(), Step::Submitted);
        assert_eq!(wizard.jump(0), Err(WizardError::AlreadySubmitted));
        assert_eq!(wizard.select(2, "guardian"), Err(WizardError::AlreadySubmitted));
        assert_eq!(wizard.submission("L1"), Err(WizardError::AlreadySubmitted));
    }

    #[test]
    fn test_can_navigate_guard() {
        assert!(!can_navigate(false, false));
        assert!(can_navigate(true, false));
        assert!(can_navigate(false, true));
        assert!(can_navigate(true, true));
    }
}
