use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

pub const MAX_PROGRESS: u8 = 100;

stored_object!(ProgressRecord, "progress", {
    user_id: String,
    topic: String,
    progress: u8
});

impl ProgressRecord {
    /// Builds a new record, rejecting values outside `0..=MAX_PROGRESS`.
    pub fn new(user_id: String, topic: String, progress: i64) -> Result<Self, AppError> {
        let value = u8::try_from(progress)
            .ok()
            .filter(|value| *value <= MAX_PROGRESS)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Progress must be between 0 and {MAX_PROGRESS}, got {progress}"
                ))
            })?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            user_id,
            topic,
            progress: value,
        })
    }

    /// Appends a progress entry. Earlier entries for the same topic are kept.
    pub async fn record(
        user_id: &str,
        topic: &str,
        progress: i64,
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        let record = Self::new(user_id.to_owned(), topic.to_owned(), progress)?;

        let stored = db.store_item(record).await?;

        stored.ok_or(AppError::InternalError(
            "Progress record was not stored".into(),
        ))
    }

    pub async fn latest(
        user_id: &str,
        topic: &str,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let record: Option<Self> = db
            .client
            .query(
                "SELECT * FROM type::table($table)
                WHERE user_id = $user_id AND topic = $topic
                ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("table", Self::table_name()))
            .bind(("user_id", user_id.to_owned()))
            .bind(("topic", topic.to_owned()))
            .await?
            .take(0)?;

        Ok(record)
    }

    /// All progress entries of a user, newest first.
    pub async fn history(user_id: &str, db: &SurrealDbClient) -> Result<Vec<Self>, AppError> {
        let records: Vec<Self> = db
            .client
            .query(
                "SELECT * FROM type::table($table)
                WHERE user_id = $user_id
                ORDER BY created_at DESC",
            )
            .bind(("table", Self::table_name()))
            .bind(("user_id", user_id.to_owned()))
            .await?
            .take(0)?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn setup_test_db() -> SurrealDbClient {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        db.apply_migrations()
            .await
            .expect("Failed to apply migrations");
        db
    }

    #[tokio::test]
    async fn test_latest_returns_most_recent_record() {
        let db = setup_test_db().await;

        ProgressRecord::record("user_1", "Photosynthesis", 40, &db)
            .await
            .expect("Failed to record progress");
        tokio::time::sleep(Duration::from_millis(5)).await;
        ProgressRecord::record("user_1", "Photosynthesis", 100, &db)
            .await
            .expect("Failed to record progress");

        let latest = ProgressRecord::latest("user_1", "Photosynthesis", &db)
            .await
            .expect("Failed to fetch latest")
            .expect("A record should exist");
        assert_eq!(latest.progress, 100);
        assert_eq!(latest.topic, "Photosynthesis");
    }

    #[tokio::test]
    async fn test_records_accumulate_without_upsert() {
        let db = setup_test_db().await;

        for value in [10, 10, 55] {
            ProgressRecord::record("user_2", "Rust", value, &db)
                .await
                .expect("Failed to record progress");
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        ProgressRecord::record("user_2", "Go", 5, &db)
            .await
            .expect("Failed to record progress");
        ProgressRecord::record("someone_else", "Rust", 90, &db)
            .await
            .expect("Failed to record progress");

        let history = ProgressRecord::history("user_2", &db)
            .await
            .expect("Failed to fetch history");
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|r| r.user_id == "user_2"));
        assert_eq!(history.last().map(|r| r.progress), Some(10));
    }

    #[tokio::test]
    async fn test_latest_for_unknown_pair_is_none() {
        let db = setup_test_db().await;

        let latest = ProgressRecord::latest("user_3", "Unknown", &db)
            .await
            .expect("Failed to fetch latest");
        assert!(latest.is_none());
    }

    #[test]
    fn test_progress_outside_range_is_rejected() {
        for value in [101, 256, -1, i64::MIN] {
            let result = ProgressRecord::new("user".into(), "topic".into(), value);
            assert!(
                matches!(&result, Err(AppError::Validation(msg)) if msg.starts_with("Progress must be between 0 and 100")),
                "value: {value}"
            );
        }

        let ok = ProgressRecord::new("user".into(), "topic".into(), 0).expect("zero is valid");
        assert_eq!(ok.progress, 0);
    }
}
