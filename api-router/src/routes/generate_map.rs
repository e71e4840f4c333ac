use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use common::storage::types::concept_relation::ConceptRelation;
use concept_pipeline::prompt::MISSING_TOPIC_MESSAGE;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct GenerateMapParams {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateMapResponse {
    pub concept_map: Vec<ConceptRelation>,
}

/// `POST /generate_map`: a body that is not JSON, lacks `topic`, or has an
/// empty topic is answered with 400. A failing model call yields an empty map.
pub async fn generate_map(
    State(state): State<ApiState>,
    payload: Result<Json<GenerateMapParams>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = payload
        .map_err(|rejection| {
            warn!(reason = %rejection.body_text(), "Rejected concept map request body");
        })
        .ok()
        .and_then(|Json(params)| params.topic)
        .filter(|topic| !topic.is_empty())
        .ok_or_else(|| ApiError::ValidationError(MISSING_TOPIC_MESSAGE.to_string()))?;

    info!(topic_bytes = topic.len(), "Received concept map request");

    let outcome = state.concept_generator.generate(&topic).await?;
    if let Some(message) = &outcome.error {
        warn!(%message, "Returning empty concept map");
    }

    Ok(Json(GenerateMapResponse {
        concept_map: outcome.relations,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use common::storage::db::SurrealDbClient;
    use concept_pipeline::testing::ScriptedInferenceClient;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::api_routes;

    use super::*;

    async fn test_app(client: ScriptedInferenceClient) -> Router {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        db.apply_migrations()
            .await
            .expect("Failed to apply migrations");

        let state = ApiState::new(Arc::new(db), Arc::new(client));
        api_routes().with_state(state)
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate_map")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_owned()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).expect("json body");
        (status, json)
    }

    #[tokio::test]
    async fn test_generate_map_returns_triples() {
        let app = test_app(ScriptedInferenceClient::replying(
            "Cell -> Nucleus: Holds the DNA\nignored line\nNucleus -> DNA: Stores genetic information",
        ))
        .await;

        let (status, body) = post_json(app, r#"{"topic": "Biology"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "concept_map": [
                    ["Cell", "Nucleus", "Holds the DNA"],
                    ["Nucleus", "DNA", "Stores genetic information"]
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_missing_or_empty_topic_is_bad_request() {
        for body in [r#"{}"#, r#"{"topic": ""}"#, r#"{"topic": null}"#, "not json", r#"{"topic": 42}"#] {
            let app = test_app(ScriptedInferenceClient::replying("A -> B: c")).await;

            let (status, json) = post_json(app, body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, json!({"error": "Please provide a topic"}));
        }
    }

    #[tokio::test]
    async fn test_model_failure_returns_empty_map() {
        let app = test_app(ScriptedInferenceClient::failing("invalid api key")).await;

        let (status, body) = post_json(app, r#"{"topic": "Chemistry"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"concept_map": []}));
    }

    #[tokio::test]
    async fn test_probes() {
        let app = test_app(ScriptedInferenceClient::replying("")).await;

        for uri in ["/live", "/ready"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
                .await
                .expect("router response");
            assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_ready_fails_before_migrations() {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        let state = ApiState::new(
            Arc::new(db),
            Arc::new(ScriptedInferenceClient::replying("")),
        );
        let app: Router = api_routes().with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
