//! Dashboard routes.

use askama::Template;
use axum::extract::State;
use axum::Json;
use lead_core::LeadStatus;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: Stats,
    pub leads: Vec<LeadRow>,
}

/// Dashboard statistics.
#[derive(Clone, Serialize)]
pub struct Stats {
    pub conversation_count: i64,
    pub question_set_count: i64,
    pub follow_up_count: i64,
    pub average_lead_score: f64,
    pub bands: Vec<BandStats>,
}

/// Number of leads in one status band.
#[derive(Clone, Serialize)]
pub struct BandStats {
    pub label: &'static str,
    pub color: &'static str,
    pub lead_count: i64,
}

/// One conversation as listed on the dashboard.
#[derive(Clone)]
pub struct LeadRow {
    pub lead_id: String,
    pub status: String,
    pub band: &'static str,
    pub color: &'static str,
    pub lead_score: String,
    pub completion: String,
    pub updated_at: String,
}

/// Render the dashboard page.
pub async fn dashboard_page(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let stats = get_stats(&state).await?;
    let leads = database::conversation::list_conversations(state.db.pool())
        .await?
        .into_iter()
        .map(|c| {
            let band = LeadStatus::from_score(c.overall_lead_score);
            LeadRow {
                band: band.label(),
                color: band.color(),
                lead_score: format!("{:.2}", c.overall_lead_score),
                completion: format!("{}/{}", c.submit_question.submitted, c.submit_question.total),
                lead_id: c.lead_id,
                status: c.status,
                updated_at: c.updated_at,
            }
        })
        .collect();

    Ok(DashboardTemplate { stats, leads })
}

/// Get dashboard statistics as JSON.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = get_stats(&state).await?;
    Ok(Json(stats))
}

/// Fetch statistics from the database.
async fn get_stats(state: &AppState) -> Result<Stats> {
    let pool = state.db.pool();

    let conversation_count = database::conversation::count_conversations(pool).await?;
    let question_set_count = database::question_set::count_question_sets(pool).await?;
    let follow_up_count = database::follow_up::count_follow_ups(pool).await?;
    let scores = database::conversation::list_lead_scores(pool).await?;

    Ok(summarize(
        conversation_count,
        question_set_count,
        follow_up_count,
        &scores,
    ))
}

fn summarize(
    conversation_count: i64,
    question_set_count: i64,
    follow_up_count: i64,
    scores: &[f64],
) -> Stats {
    let average_lead_score = if scores.is_empty() {
        0.0
    } else {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        (mean * 100.0).round() / 100.0
    };

    let bands = LeadStatus::ALL
        .iter()
        .map(|band| BandStats {
            label: band.label(),
            color: band.color(),
            lead_count: scores
                .iter()
                .filter(|score| LeadStatus::from_score(**score) == *band)
                .count() as i64,
        })
        .collect();

    Stats {
        conversation_count,
        question_set_count,
        follow_up_count,
        average_lead_score,
        bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(0, 0, 0, &[]);
        assert_eq!(stats.average_lead_score, 0.0);
        assert_eq!(stats.bands.len(), 5);
        assert!(stats.bands.iter().all(|b| b.lead_count == 0));
    }

    #[test]
    fn test_summarize_bands() {
        let stats = summarize(4, 1, 2, &[20.0, 58.0, 68.0, 90.0]);
        assert_eq!(stats.average_lead_score, 59.0);

        let counts: Vec<(&str, i64)> = stats.bands.iter().map(|b| (b.label, b.lead_count)).collect();
        assert_eq!(
            counts,
            vec![
                ("Poor", 1),
                ("Average", 0),
                ("Good", 2),
                ("Very Good", 0),
                ("Excellent", 1),
            ]
        );
    }
}
