use std::sync::Arc;

use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use common::error::AppError;
use tracing::debug;

use crate::OpenAIClientType;

/// One system + user exchange with a chat-completion model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Returns the text of the model's first reply.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;
}

pub struct DefaultInferenceClient {
    openai_client: Arc<OpenAIClientType>,
}

impl DefaultInferenceClient {
    pub fn new(openai_client: Arc<OpenAIClientType>) -> Self {
        Self { openai_client }
    }

    fn prepare_request(
        request: &CompletionRequest,
    ) -> Result<CreateChatCompletionRequest, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages([
                ChatCompletionRequestSystemMessage::from(request.system_prompt.as_str()).into(),
                ChatCompletionRequestUserMessage::from(request.user_prompt.clone()).into(),
            ])
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl InferenceClient for DefaultInferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        debug!(model = %request.model, "Sending chat completion request");
        let llm_request = Self::prepare_request(&request)?;

        let response = self.openai_client.chat().create(llm_request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(AppError::LLMParsing(
                "No content found in LLM response".into(),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_request_carries_model_and_both_messages() {
        let request = CompletionRequest {
            model: "gpt-4".to_string(),
            system_prompt: "You are a concept mapping assistant.".to_string(),
            user_prompt: "Generate a list".to_string(),
        };

        let prepared = DefaultInferenceClient::prepare_request(&request).expect("request");

        assert_eq!(prepared.model, "gpt-4");
        assert_eq!(prepared.messages.len(), 2);
    }
}
