use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::try_join;

use common::storage::types::{progress_record::ProgressRecord, shared_map::SharedMap};

use crate::{
    html_state::HtmlState,
    middlewares::{
        auth_middleware::RequireUser,
        response_middleware::{HtmlError, TemplateResponse},
    },
};

#[derive(Serialize)]
struct ProgressRow {
    topic: String,
    progress: u8,
    recorded_at: String,
}

#[derive(Serialize)]
struct SharedMapRow {
    topic: String,
    map_data: String,
    shared_at: String,
}

#[derive(Serialize)]
pub struct HistoryPageData {
    progress: Vec<ProgressRow>,
    shared_maps: Vec<SharedMapRow>,
}

fn display_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub async fn show_history(
    State(state): State<HtmlState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, HtmlError> {
    let (progress, shared_maps) = try_join!(
        ProgressRecord::history(&user.id, &state.db),
        SharedMap::get_user_shared_maps(&user.id, &state.db),
    )?;

    Ok(TemplateResponse::new_template(
        "history/base.html",
        HistoryPageData {
            progress: progress
                .into_iter()
                .map(|record| ProgressRow {
                    recorded_at: display_time(&record.created_at),
                    topic: record.topic,
                    progress: record.progress,
                })
                .collect(),
            shared_maps: shared_maps
                .into_iter()
                .map(|map| SharedMapRow {
                    shared_at: display_time(&map.created_at),
                    topic: map.topic,
                    map_data: map.map_data,
                })
                .collect(),
        },
    ))
}
