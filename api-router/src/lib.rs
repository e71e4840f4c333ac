use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use routes::{
    generate_map::generate_map,
    probes::{live, ready},
};

pub mod api_state;
pub mod error;
mod routes;

/// Topics are short; anything larger than this is not a topic.
const GENERATE_MAP_MAX_BODY_BYTES: usize = 64 * 1024;

/// Router for the JSON API, mounted at the root so `/generate_map` keeps its path.
pub fn api_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Public, unauthenticated endpoints (for k8s/systemd probes)
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    let concept_map = Router::new().route(
        "/generate_map",
        post(generate_map).layer(DefaultBodyLimit::max(GENERATE_MAP_MAX_BODY_BYTES)),
    );

    probes.merge(concept_map)
}
