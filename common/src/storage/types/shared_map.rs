use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::concept_relation::{format_relations, ConceptRelation};

stored_object!(SharedMap, "shared_maps", {
    user_id: String,
    topic: String,
    map_data: String
});

impl SharedMap {
    pub fn new(user_id: String, topic: String, relations: &[ConceptRelation]) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            user_id,
            topic,
            map_data: format_relations(relations),
        }
    }

    /// Stores a snapshot of the map. Sharing the same map again creates another snapshot.
    pub async fn share(
        user_id: &str,
        topic: &str,
        relations: &[ConceptRelation],
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        let shared = Self::new(user_id.to_owned(), topic.to_owned(), relations);

        let stored = db.store_item(shared).await?;

        stored.ok_or(AppError::InternalError("Shared map was not stored".into()))
    }

    pub async fn get_user_shared_maps(
        user_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let maps: Vec<Self> = db
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

        Ok(maps)
    }
}
