//! Organization question catalog persistence.

use lead_core::{
    assign_question_ids, max_question_id, resolve_catalog, Question, QuestionDraft, QuestionSet,
};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::QuestionSetRow;
use crate::validation::{validate_question_set, ValidationError, MAX_QUESTION_ID};

/// Replace an organization's question set.
///
/// The stored set is replaced wholesale, never merged. Questions without an
/// id get one past the highest id this organization has ever used, so ids
/// dropped by an earlier replacement are not handed out again.
pub async fn upsert_question_set(
    pool: &SqlitePool,
    organization_id: &str,
    drafts: Vec<QuestionDraft>,
) -> Result<QuestionSet> {
    validate_question_set(organization_id, &drafts)?;
    let organization_id = organization_id.trim();

    let mut tx = pool.begin().await?;

    let high_water = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT last_question_id
        FROM question_sets
        WHERE organization_id = ?
        "#,
    )
    .bind(organization_id)
    .fetch_optional(&mut *tx)
    .await?
    .unwrap_or(0);

    let questions = assign_question_ids(drafts, high_water)
        .filter(|questions| max_question_id(questions) <= MAX_QUESTION_ID)
        .ok_or(ValidationError::QuestionIdOverflow)?;
    let last_question_id = max_question_id(&questions).max(high_water);
    let encoded = serde_json::to_string(&questions)?;

    sqlx::query(
        r#"
        INSERT INTO question_sets (organization_id, questions, last_question_id)
        VALUES (?, ?, ?)
        ON CONFLICT(organization_id) DO UPDATE SET
            questions = excluded.questions,
            last_question_id = excluded.last_question_id,
            updated_at = datetime('now')
        "#,
    )
    .bind(organization_id)
    .bind(&encoded)
    .bind(last_question_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        organization_id,
        questions = questions.len(),
        last_question_id,
        "Question set saved"
    );

    get_question_set(pool, organization_id).await
}

/// Get an organization's question set.
pub async fn get_question_set(pool: &SqlitePool, organization_id: &str) -> Result<QuestionSet> {
    sqlx::query_as::<_, QuestionSetRow>(
        r#"
        SELECT organization_id, questions, created_at, updated_at
        FROM question_sets
        WHERE organization_id = ?
        "#,
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Question set",
        id: organization_id.to_string(),
    })?
    .into_question_set()
}

/// The catalog conversations for this organization run against: its own
/// question set when stored and non-empty, otherwise the default catalog.
pub async fn catalog_for(pool: &SqlitePool, organization_id: &str) -> Result<Vec<Question>> {
    match get_question_set(pool, organization_id).await {
        Ok(set) => Ok(resolve_catalog(Some(set.questions))),
        Err(DatabaseError::NotFound { .. }) => Ok(resolve_catalog(None)),
        Err(err) => Err(err),
    }
}

/// Count stored question sets.
pub async fn count_question_sets(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM question_sets
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use lead_core::{default_catalog, OptionDraft};

    fn draft(id: Option<i64>, title: &str) -> QuestionDraft {
        QuestionDraft {
            id,
            title: title.to_string(),
            question_text: format!("{}?", title),
            options: vec![
                OptionDraft {
                    value: None,
                    label: "Yes, Ready".to_string(),
                    point: Some(1),
                },
                OptionDraft {
                    value: Some("not_now".to_string()),
                    label: "Not Now".to_string(),
                    point: Some(-1),
                },
            ],
        }
    }

    fn ids(set: &QuestionSet) -> Vec<i64> {
        set.questions.iter().map(|q| q.id).collect()
    }

    #[tokio::test]
    async fn test_upsert_assigns_ids_and_slugs() {
        let db = Database::in_memory().await.unwrap();

        let set = upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(None, "Budget"), draft(None, "Timeline")],
        )
        .await
        .unwrap();

        assert_eq!(set.organization_id, "org-1");
        assert_eq!(ids(&set), vec![1, 2]);
        assert_eq!(set.questions[0].options[0].value, "yes-ready");
        assert_eq!(set.questions[0].options[1].value, "not_now");
        assert_eq!(set.questions[1].question_text, "Timeline?");
    }

    #[tokio::test]
    async fn test_upsert_replaces_wholesale() {
        let db = Database::in_memory().await.unwrap();

        upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(None, "A"), draft(None, "B"), draft(None, "C")],
        )
        .await
        .unwrap();

        let set = upsert_question_set(db.pool(), "org-1", vec![draft(Some(2), "B")])
            .await
            .unwrap();
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].title, "B");
        assert_eq!(count_question_sets(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_retired_ids_not_reused() {
        let db = Database::in_memory().await.unwrap();

        upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(None, "A"), draft(None, "B"), draft(None, "C")],
        )
        .await
        .unwrap();

        // Question 3 is retired; the new question must not take its id.
        let set = upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(Some(1), "A"), draft(Some(2), "B"), draft(None, "D")],
        )
        .await
        .unwrap();
        assert_eq!(ids(&set), vec![1, 2, 4]);

        // Other organizations keep their own counter.
        let other = upsert_question_set(db.pool(), "org-2", vec![draft(None, "X")])
            .await
            .unwrap();
        assert_eq!(ids(&other), vec![1]);
    }

    #[tokio::test]
    async fn test_upsert_validation_leaves_store_untouched() {
        let db = Database::in_memory().await.unwrap();

        let mut bad = draft(None, "A");
        bad.options.truncate(1);
        let result = upsert_question_set(db.pool(), "org-1", vec![bad]).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::TooFewOptions { .. }))
        ));

        let result = get_question_set(db.pool(), "org-1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_upsert_rejects_ids_past_cap() {
        let db = Database::in_memory().await.unwrap();

        let result = upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(Some(i64::MAX), "A"), draft(None, "B")],
        )
        .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::InvalidQuestionId(
                i64::MAX
            )))
        ));

        // No id is left above the highest accepted one.
        let result = upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(Some(MAX_QUESTION_ID), "A"), draft(None, "B")],
        )
        .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::QuestionIdOverflow))
        ));
        assert!(matches!(
            get_question_set(db.pool(), "org-1").await,
            Err(DatabaseError::NotFound { .. })
        ));

        let set = upsert_question_set(
            db.pool(),
            "org-1",
            vec![draft(Some(MAX_QUESTION_ID - 1), "A"), draft(None, "B")],
        )
        .await
        .unwrap();
        assert_eq!(ids(&set), vec![MAX_QUESTION_ID - 1, MAX_QUESTION_ID]);
    }

    #[tokio::test]
    async fn test_catalog_for_falls_back_to_default() {
        let db = Database::in_memory().await.unwrap();

        let catalog = catalog_for(db.pool(), "org-1").await.unwrap();
        assert_eq!(catalog, default_catalog());

        let set = upsert_question_set(db.pool(), "org-1", vec![draft(None, "Only")])
            .await
            .unwrap();
        let catalog = catalog_for(db.pool(), "org-1").await.unwrap();
        assert_eq!(catalog, set.questions);
    }
}
