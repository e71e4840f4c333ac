//! Scripted stand-ins for the inference API, shared with the router crates' tests.

use async_trait::async_trait;
use common::error::AppError;
use tokio::sync::Mutex;

use crate::inference::{CompletionRequest, InferenceClient};

pub struct ScriptedInferenceClient {
    reply: Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedInferenceClient {
    /// Answers every request with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with an internal error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl InferenceClient for ScriptedInferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        self.requests.lock().await.push(request);
        self.reply.clone().map_err(AppError::InternalError)
    }
}
