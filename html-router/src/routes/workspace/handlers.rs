use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use common::{
    error::AppError,
    storage::types::{
        concept_relation::ConceptRelation,
        progress_record::{ProgressRecord, MAX_PROGRESS},
        shared_map::SharedMap,
    },
};
use concept_pipeline::{
    graph::{node_information, ConceptGraph},
    prompt::MISSING_TOPIC_MESSAGE,
    quiz::{score_quiz, QuizScore},
};

use crate::{
    html_state::HtmlState,
    middlewares::{
        auth_middleware::RequireUser,
        response_middleware::{HtmlError, TemplateResponse},
    },
    workspace::{ChatExchange, Notice, Workspace},
    SessionType,
};

const NO_MAP_MESSAGE: &str = "Generate a concept map first.";

#[derive(Deserialize)]
pub struct WorkspaceParams {
    pub node: Option<String>,
}

#[derive(Serialize)]
struct QuizEntry {
    index: usize,
    question: String,
    response: String,
}

#[derive(Serialize)]
pub struct WorkspacePageData {
    topic: Option<String>,
    relations: Vec<ConceptRelation>,
    graph: ConceptGraph,
    selected_node: Option<String>,
    node_relations: Vec<ConceptRelation>,
    quiz: Vec<QuizEntry>,
    quiz_score: Option<QuizScore>,
    chat: Option<ChatExchange>,
    latest_progress: Option<u8>,
    max_progress: u8,
    notice: Option<Notice>,
}

pub async fn show_workspace(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
    session: SessionType,
    Query(params): Query<WorkspaceParams>,
) -> Result<impl IntoResponse, HtmlError> {
    let workspace = Workspace::load(&session);
    let notice = Notice::take(&session);

    let graph = ConceptGraph::from_relations(&workspace.relations);
    let selected_node = params
        .node
        .filter(|node| graph.contains(node))
        .or_else(|| graph.labels().first().map(|label| (*label).to_string()));
    let node_relations = selected_node
        .as_deref()
        .map(|node| {
            node_information(&workspace.relations, node)
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let latest_progress = match workspace.active_topic() {
        Some(topic) => ProgressRecord::latest(&user.id, topic, &state.db)
            .await?
            .map(|record| record.progress),
        None => None,
    };

    let quiz = workspace
        .quiz
        .iter()
        .enumerate()
        .map(|(index, question)| QuizEntry {
            index,
            question: question.question.clone(),
            response: workspace
                .quiz_answers
                .get(index)
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    Ok(TemplateResponse::new_template(
        "workspace/base.html",
        WorkspacePageData {
            topic: workspace.topic,
            relations: workspace.relations,
            graph,
            selected_node,
            node_relations,
            quiz,
            quiz_score: workspace.quiz_score,
            chat: workspace.chat,
            latest_progress,
            max_progress: MAX_PROGRESS,
            notice,
        },
    ))
}

#[derive(Deserialize)]
pub struct ConceptMapParams {
    #[serde(default)]
    pub topic: String,
}

pub async fn generate_concept_map(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
    session: SessionType,
    Form(form): Form<ConceptMapParams>,
) -> Result<impl IntoResponse, HtmlError> {
    if form.topic.is_empty() {
        Notice::error(MISSING_TOPIC_MESSAGE).flash(&session);
        return Ok(TemplateResponse::redirect("/"));
    }

    let outcome = state.concept_generator.generate(&form.topic).await?;
    info!(
        user_id = %user.id,
        relations = outcome.relations.len(),
        "Generated concept map"
    );

    let empty = outcome.relations.is_empty();
    Workspace::with_map(form.topic, outcome.relations).save(&session);

    if let Some(message) = outcome.error {
        Notice::error(message).flash(&session);
    } else if empty {
        Notice::error("The reply did not contain any concept relations.").flash(&session);
    }

    Ok(TemplateResponse::redirect("/"))
}

#[derive(Deserialize)]
pub struct ProgressParams {
    pub progress: i64,
}

pub async fn record_progress(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
    session: SessionType,
    Form(form): Form<ProgressParams>,
) -> Result<impl IntoResponse, HtmlError> {
    let workspace = Workspace::load(&session);
    let Some(topic) = workspace.active_topic() else {
        Notice::error(NO_MAP_MESSAGE).flash(&session);
        return Ok(TemplateResponse::redirect("/"));
    };

    let notice = match ProgressRecord::record(&user.id, topic, form.progress, &state.db).await {
        Ok(record) => {
            info!(user_id = %user.id, progress = record.progress, "Recorded progress");
            Notice::success("Progress updated successfully!")
        }
        Err(AppError::Validation(message)) => Notice::error(message),
        Err(err) => return Err(err.into()),
    };
    notice.flash(&session);

    Ok(TemplateResponse::redirect("/"))
}

pub async fn share_concept_map(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
    session: SessionType,
) -> Result<impl IntoResponse, HtmlError> {
    let workspace = Workspace::load(&session);
    let Some(topic) = workspace.active_topic() else {
        Notice::error(NO_MAP_MESSAGE).flash(&session);
        return Ok(TemplateResponse::redirect("/"));
    };

    let shared = SharedMap::share(&user.id, topic, &workspace.relations, &state.db).await?;
    info!(user_id = %user.id, shared_map_id = %shared.id, "Shared concept map");
    Notice::success("Concept map shared successfully!").flash(&session);

    Ok(TemplateResponse::redirect("/"))
}

/// Collects `answer_0 .. answer_{count-1}` in order; missing fields become empty answers.
fn quiz_answers_from_form(form: &HashMap<String, String>, count: usize) -> Vec<String> {
    (0..count)
        .map(|index| {
            form.get(&format!("answer_{index}"))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

pub async fn submit_quiz(
    RequireUser(user): RequireUser,
    session: SessionType,
    Form(form): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, HtmlError> {
    let mut workspace = Workspace::load(&session);
    if workspace.quiz.is_empty() {
        Notice::error(NO_MAP_MESSAGE).flash(&session);
        return Ok(TemplateResponse::redirect("/"));
    }

    let answers = quiz_answers_from_form(&form, workspace.quiz.len());
    let score = score_quiz(&workspace.quiz, &answers);
    info!(user_id = %user.id, correct = score.correct, total = score.total, "Scored quiz");

    workspace.quiz_answers = answers;
    workspace.quiz_score = Some(score);
    workspace.save(&session);

    Ok(TemplateResponse::redirect("/"))
}

#[derive(Deserialize)]
pub struct ChatParams {
    #[serde(default)]
    pub question: String,
}

pub async fn ask_assistant(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
    session: SessionType,
    Form(form): Form<ChatParams>,
) -> Result<impl IntoResponse, HtmlError> {
    match state.chat_assistant.ask(&form.question).await {
        Ok(answer) => {
            let mut workspace = Workspace::load(&session);
            workspace.chat = Some(ChatExchange {
                question: form.question,
                answer,
            });
            workspace.save(&session);
        }
        Err(AppError::Validation(message)) => Notice::error(message).flash(&session),
        Err(err) => {
            warn!(user_id = %user.id, error = %err, "Chat request failed");
            Notice::error(format!("Error generating response: {err}")).flash(&session);
        }
    }

    Ok(TemplateResponse::redirect("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_answers_follow_question_order() {
        let form = HashMap::from([
            ("answer_1".to_string(), "second".to_string()),
            ("answer_0".to_string(), "first".to_string()),
            ("answer_7".to_string(), "ignored".to_string()),
            ("other".to_string(), "ignored".to_string()),
        ]);

        let answers = quiz_answers_from_form(&form, 3);

        assert_eq!(answers, vec!["first", "second", ""]);
    }

    #[test]
    fn test_quiz_answers_for_empty_quiz() {
        assert!(quiz_answers_from_form(&HashMap::new(), 0).is_empty());
    }
}
