use async_openai::error::OpenAIError;
use thiserror::Error;

/// Error type shared by storage, pipelines and both routers. Each router maps
/// it onto its own response type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("Inference API error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Authorization error: {0}")]
    Auth(String),
    #[error("Unexpected model reply: {0}")]
    LLMParsing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}
