use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::storage::types::system_settings::SystemSettings;
use serde_json::json;

use crate::api_state::ApiState;

/// Answers 200 whenever the process can serve requests.
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// 200 once the database answers and has been migrated, 503 otherwise.
/// The seeded settings record doubles as the migration marker.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match SystemSettings::get_current(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "checks": {"db": "ok"}})),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "error", "checks": {"db": "fail"}})),
            )
        }
    }
}
