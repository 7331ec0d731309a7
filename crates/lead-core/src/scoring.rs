//! Lead scoring.
//!
//! The composite lead score blends three percentages:
//!
//! | Term | Percentage | Weight |
//! |------|------------|--------|
//! | completion | `submitted / total * 100` | 0.10 |
//! | rating | `rating / 5 * 100` | 0.60 |
//! | answers | `max(0, answer_score / total * 100)` | 0.30 |
//!
//! The sum is clamped to `[0, 100]` and rounded to two decimals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{find_question, Question};
use crate::record::Answer;

/// Highest satisfaction rating. 0 means unrated.
pub const MAX_RATING: u8 = 5;

/// Weight of the completion percentage.
pub const SUBMIT_WEIGHT: f64 = 0.10;

/// Weight of the rating percentage.
pub const RATING_WEIGHT: f64 = 0.60;

/// Weight of the answer-sentiment percentage.
pub const ANSWER_WEIGHT: f64 = 0.30;

/// Both derived scores plus the counts they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub overall_answer_score: i64,
    pub overall_lead_score: f64,
    pub submitted: usize,
    pub total: usize,
}

/// Sum of the selected options' points. Answers whose question or option
/// cannot be found in the catalog contribute 0.
pub fn overall_answer_score(answers: &BTreeMap<i64, String>, catalog: &[Question]) -> i64 {
    answers
        .iter()
        .map(|(id, value)| {
            find_question(catalog, *id)
                .and_then(|q| q.point_for(value))
                .unwrap_or(0)
        })
        .sum()
}

/// Sum of the point snapshots stored with recorded answers.
pub fn snapshot_answer_score(answers: &[Answer]) -> i64 {
    answers.iter().map(|a| a.point).sum()
}

/// Composite 0-100 lead score.
pub fn overall_lead_score(submitted: usize, total: usize, rating: u8, answer_score: i64) -> f64 {
    let submit_weighted = if total > 0 {
        submitted as f64 / total as f64 * 100.0 * SUBMIT_WEIGHT
    } else {
        0.0
    };

    let rating = rating.min(MAX_RATING);
    let rating_weighted = if rating > 0 {
        f64::from(rating) / f64::from(MAX_RATING) * 100.0 * RATING_WEIGHT
    } else {
        0.0
    };

    let answer_weighted = if total > 0 {
        (answer_score as f64 / total as f64 * 100.0).max(0.0) * ANSWER_WEIGHT
    } else {
        0.0
    };

    round2((submit_weighted + rating_weighted + answer_weighted).clamp(0.0, 100.0))
}

/// Score the current answers against a catalog.
pub fn score(answers: &BTreeMap<i64, String>, catalog: &[Question], rating: u8) -> LeadScore {
    let overall_answer_score = overall_answer_score(answers, catalog);
    let submitted = answers.len();
    let total = catalog.len();

    LeadScore {
        overall_answer_score,
        overall_lead_score: overall_lead_score(submitted, total, rating, overall_answer_score),
        submitted,
        total,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
