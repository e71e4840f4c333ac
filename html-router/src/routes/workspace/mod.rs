mod handlers;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use handlers::{
    ask_assistant, generate_concept_map, record_progress, share_concept_map, show_workspace,
    submit_quiz,
};

use crate::html_state::HtmlState;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new()
        .route("/", get(show_workspace))
        .route("/concept-map", post(generate_concept_map))
        .route("/progress", post(record_progress))
        .route("/share", post(share_concept_map))
        .route("/quiz", post(submit_quiz))
        .route("/chat", post(ask_assistant))
}
