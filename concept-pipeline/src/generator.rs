use std::sync::Arc;

use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{concept_relation::ConceptRelation, system_settings::SystemSettings},
    },
};
use tracing::{info, warn};

use crate::{
    inference::{CompletionRequest, InferenceClient},
    parser::parse_concept_map,
    prompt::build_concept_map_prompt,
};

/// Result of a generation attempt. A failed model call is not an error: it
/// produces no relations and a message meant for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConceptMapOutcome {
    pub relations: Vec<ConceptRelation>,
    pub error: Option<String>,
}

impl ConceptMapOutcome {
    fn failed(message: String) -> Self {
        Self {
            relations: Vec::new(),
            error: Some(message),
        }
    }
}

pub struct ConceptMapGenerator {
    db: Arc<SurrealDbClient>,
    client: Arc<dyn InferenceClient>,
}

impl ConceptMapGenerator {
    pub fn new(db: Arc<SurrealDbClient>, client: Arc<dyn InferenceClient>) -> Self {
        Self { db, client }
    }

    /// Asks the model for a concept map of `topic`.
    ///
    /// Only a missing topic and settings lookup failures are returned as
    /// errors. Every failure of the model call degrades to an empty outcome.
    #[tracing::instrument(skip(self))]
    pub async fn generate(&self, topic: &str) -> Result<ConceptMapOutcome, AppError> {
        let prompt = build_concept_map_prompt(topic)?;
        let settings = SystemSettings::get_current(&self.db).await?;

        let request = CompletionRequest {
            model: settings.concept_model,
            system_prompt: settings.concept_system_prompt,
            user_prompt: prompt,
        };

        match self.client.complete(request).await {
            Ok(reply) => {
                let relations = parse_concept_map(&reply);
                info!(relation_count = relations.len(), "Generated concept map");
                Ok(ConceptMapOutcome {
                    relations,
                    error: None,
                })
            }
            Err(err) => {
                warn!(error = %err, "Concept map generation failed");
                Ok(ConceptMapOutcome::failed(format!(
                    "Error generating concept map: {err}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedInferenceClient;
    use uuid::Uuid;

    async fn setup_test_db() -> Arc<SurrealDbClient> {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        db.apply_migrations()
            .await
            .expect("Failed to apply migrations");
        Arc::new(db)
    }

    #[tokio::test]
    async fn test_generate_parses_model_reply() {
        let db = setup_test_db().await;
        let client = Arc::new(ScriptedInferenceClient::replying(
            "Sure! Here you go:\nRust -> Ownership: Memory is managed through ownership\nOwnership -> Borrowing: References borrow without taking ownership",
        ));
        let generator = ConceptMapGenerator::new(db, client.clone());

        let outcome = generator.generate("Rust").await.expect("generate");

        assert_eq!(outcome.error, None);
        assert_eq!(
            outcome.relations,
            vec![
                ConceptRelation::new("Rust", "Ownership", "Memory is managed through ownership"),
                ConceptRelation::new(
                    "Ownership",
                    "Borrowing",
                    "References borrow without taking ownership"
                ),
            ]
        );

        let requests = client.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4");
        assert_eq!(
            requests[0].system_prompt,
            "You are a concept mapping assistant."
        );
        assert!(requests[0].user_prompt.contains("Rust"));
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_empty_outcome() {
        let db = setup_test_db().await;
        let client = Arc::new(ScriptedInferenceClient::failing("rate limited"));
        let generator = ConceptMapGenerator::new(db, client);

        let outcome = generator.generate("Rust").await.expect("generate");

        assert!(outcome.relations.is_empty());
        let message = outcome.error.expect("a display message");
        assert!(message.starts_with("Error generating concept map:"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_missing_topic_is_surfaced_without_calling_the_model() {
        let db = setup_test_db().await;
        let client = Arc::new(ScriptedInferenceClient::replying("A -> B: c"));
        let generator = ConceptMapGenerator::new(db, client.clone());

        let result = generator.generate("").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(client.requests().await.is_empty());
    }
}
