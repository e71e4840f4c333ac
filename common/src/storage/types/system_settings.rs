use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::system_prompts::{
    DEFAULT_CHAT_SYSTEM_PROMPT, DEFAULT_CONCEPT_MAP_SYSTEM_PROMPT, DEFAULT_MODEL,
};

const CURRENT_SETTINGS_ID: &str = "current";

stored_object!(SystemSettings, "system_settings", {
    registrations_enabled: bool,
    concept_model: String,
    chat_model: String,
    concept_system_prompt: String,
    chat_system_prompt: String
});

impl SystemSettings {
    pub async fn ensure_initialized(db: &SurrealDbClient) -> Result<Self, AppError> {
        if let Some(settings) = db.get_item::<Self>(CURRENT_SETTINGS_ID).await? {
            return Ok(settings);
        }

        let created = db.store_item(Self::default()).await?;

        created.ok_or(AppError::Validation("Failed to initialize settings".into()))
    }

    pub async fn get_current(db: &SurrealDbClient) -> Result<Self, AppError> {
        let settings: Option<Self> = db.get_item(CURRENT_SETTINGS_ID).await?;

        settings.ok_or(AppError::NotFound("System settings not found".into()))
    }

    pub async fn update(db: &SurrealDbClient, changes: Self) -> Result<Self, AppError> {
        let updated: Option<Self> = db
            .client
            .query(
                "UPDATE type::thing('system_settings', $id) SET
                    registrations_enabled = $registrations_enabled,
                    concept_model = $concept_model,
                    chat_model = $chat_model,
                    concept_system_prompt = $concept_system_prompt,
                    chat_system_prompt = $chat_system_prompt,
                    updated_at = time::now()
                RETURN AFTER",
            )
            .bind(("id", CURRENT_SETTINGS_ID))
            .bind(("registrations_enabled", changes.registrations_enabled))
            .bind(("concept_model", changes.concept_model))
            .bind(("chat_model", changes.chat_model))
            .bind(("concept_system_prompt", changes.concept_system_prompt))
            .bind(("chat_system_prompt", changes.chat_system_prompt))
            .await?
            .take(0)?;

        updated.ok_or(AppError::Validation(
            "Something went wrong updating the settings".into(),
        ))
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: CURRENT_SETTINGS_ID.to_string(),
            created_at: now,
            updated_at: now,
            registrations_enabled: true,
            concept_model: DEFAULT_MODEL.to_string(),
            chat_model: DEFAULT_MODEL.to_string(),
            concept_system_prompt: DEFAULT_CONCEPT_MAP_SYSTEM_PROMPT.to_string(),
            chat_system_prompt: DEFAULT_CHAT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_ensure_initialized_seeds_defaults_once() {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");

        let first = SystemSettings::ensure_initialized(&db)
            .await
            .expect("Failed to initialize settings");
        assert_eq!(first.concept_model, "gpt-4");
        assert_eq!(
            first.concept_system_prompt,
            "You are a concept mapping assistant."
        );
        assert_eq!(first.chat_system_prompt, "You are a helpful assistant.");

        let mut changes = first.clone();
        changes.chat_model = "gpt-4o-mini".to_string();
        SystemSettings::update(&db, changes)
            .await
            .expect("Failed to update settings");

        let second = SystemSettings::ensure_initialized(&db)
            .await
            .expect("Failed to re-run initialization");
        assert_eq!(second.chat_model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_get_current_without_initialization() {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");

        let result = SystemSettings::get_current(&db).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
