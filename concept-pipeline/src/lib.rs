#![allow(clippy::missing_docs_in_private_items)]

pub mod chat;
pub mod generator;
pub mod graph;
pub mod inference;
pub mod parser;
pub mod prompt;
pub mod quiz;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use chat::ChatAssistant;
pub use generator::{ConceptMapGenerator, ConceptMapOutcome};
#[allow(clippy::module_name_repetitions)]
pub use inference::{CompletionRequest, DefaultInferenceClient, InferenceClient};

pub type OpenAIClientType = async_openai::Client<async_openai::config::OpenAIConfig>;
