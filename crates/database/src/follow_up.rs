//! Follow-up reminder persistence.
//!
//! Follow-ups are append-only: each submission that carries a date or time
//! adds a new row instead of replacing the previous one.

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::FollowUp;
use crate::Result;

/// Insert a follow-up on an open connection (usually a transaction).
pub(crate) async fn insert_follow_up(
    conn: &mut SqliteConnection,
    lead_id: &str,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO follow_ups (lead_id, next_follow_up_date, next_follow_up_time)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(lead_id)
    .bind(date)
    .bind(time)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List a lead's follow-ups, oldest first.
pub async fn list_follow_ups(pool: &SqlitePool, lead_id: &str) -> Result<Vec<FollowUp>> {
    let records = sqlx::query_as::<_, FollowUp>(
        r#"
        SELECT id, lead_id, next_follow_up_date, next_follow_up_time, created_at
        FROM follow_ups
        WHERE lead_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(lead_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Most recent follow-up for a lead.
pub async fn latest_follow_up(pool: &SqlitePool, lead_id: &str) -> Result<Option<FollowUp>> {
    let record = sqlx::query_as::<_, FollowUp>(
        r#"
        SELECT id, lead_id, next_follow_up_date, next_follow_up_time, created_at
        FROM follow_ups
        WHERE lead_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(lead_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Count all follow-ups.
pub async fn count_follow_ups(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM follow_ups
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
