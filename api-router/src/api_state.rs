use std::sync::Arc;

use common::storage::db::SurrealDbClient;
use concept_pipeline::{ConceptMapGenerator, InferenceClient};

#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SurrealDbClient>,
    pub concept_generator: Arc<ConceptMapGenerator>,
}

impl ApiState {
    pub fn new(db: Arc<SurrealDbClient>, inference_client: Arc<dyn InferenceClient>) -> Self {
        let concept_generator = Arc::new(ConceptMapGenerator::new(
            Arc::clone(&db),
            inference_client,
        ));

        Self {
            db,
            concept_generator,
        }
    }
}
