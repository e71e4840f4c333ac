use std::sync::Arc;

use common::{
    error::AppError,
    storage::{db::SurrealDbClient, types::system_settings::SystemSettings},
};
use tracing::debug;

use crate::inference::{CompletionRequest, InferenceClient};

/// Free-form questions about a topic, answered with the chat system prompt.
pub struct ChatAssistant {
    db: Arc<SurrealDbClient>,
    client: Arc<dyn InferenceClient>,
}

impl ChatAssistant {
    pub fn new(db: Arc<SurrealDbClient>, client: Arc<dyn InferenceClient>) -> Self {
        Self { db, client }
    }

    pub async fn ask(&self, question: &str) -> Result<String, AppError> {
        if question.is_empty() {
            return Err(AppError::Validation("Please ask a question".into()));
        }

        let settings = SystemSettings::get_current(&self.db).await?;
        debug!(model = %settings.chat_model, "Forwarding chat question");

        self.client
            .complete(CompletionRequest {
                model: settings.chat_model,
                system_prompt: settings.chat_system_prompt,
                user_prompt: question.to_owned(),
            })
            .await
    }
}
