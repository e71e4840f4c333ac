use std::sync::Arc;

use common::storage::db::SurrealDbClient;
use common::utils::template_engine::{ProvidesTemplateEngine, TemplateEngine};
use common::create_template_engine;
use concept_pipeline::{ChatAssistant, ConceptMapGenerator, InferenceClient};
use tracing::debug;

use crate::SessionStoreType;

#[derive(Clone)]
pub struct HtmlState {
    pub db: Arc<SurrealDbClient>,
    pub templates: Arc<TemplateEngine>,
    pub session_store: Arc<SessionStoreType>,
    pub concept_generator: Arc<ConceptMapGenerator>,
    pub chat_assistant: Arc<ChatAssistant>,
}

impl HtmlState {
    /// Wires the page handlers to the database and the model client.
    ///
    /// `template_engine` lets tests and embedders share an engine; otherwise
    /// the crate's own `templates/` directory is loaded.
    pub fn new_with_resources(
        db: Arc<SurrealDbClient>,
        inference_client: Arc<dyn InferenceClient>,
        session_store: Arc<SessionStoreType>,
        template_engine: Option<Arc<TemplateEngine>>,
    ) -> Self {
        let templates =
            template_engine.unwrap_or_else(|| Arc::new(create_template_engine!("templates")));
        debug!("Template engine configured for html_router.");

        Self {
            concept_generator: Arc::new(ConceptMapGenerator::new(
                db.clone(),
                inference_client.clone(),
            )),
            chat_assistant: Arc::new(ChatAssistant::new(db.clone(), inference_client)),
            db,
            session_store,
            templates,
        }
    }
}

impl ProvidesTemplateEngine for HtmlState {
    fn template_engine(&self) -> &Arc<TemplateEngine> {
        &self.templates
    }
}
