use axum::{extract::State, response::IntoResponse, Form};
use axum_htmx::HxBoosted;
use serde::Deserialize;
use tracing::info;

use crate::{
    html_state::HtmlState,
    middlewares::response_middleware::{HtmlError, TemplateResponse},
    workspace::Workspace,
    AuthSessionType, SessionType,
};
use common::storage::types::user::User;

#[derive(Deserialize)]
pub struct SigninParams {
    pub username: String,
    pub password: String,
    pub remember_me: Option<String>,
}

pub async fn show_signin_form(
    auth: AuthSessionType,
    HxBoosted(boosted): HxBoosted,
) -> Result<impl IntoResponse, HtmlError> {
    if auth.is_authenticated() {
        return Ok(TemplateResponse::redirect("/"));
    }
    if boosted {
        Ok(TemplateResponse::new_partial("auth/signin.html", "body", ()))
    } else {
        Ok(TemplateResponse::new_template("auth/signin.html", ()))
    }
}

pub async fn authenticate_user(
    State(state): State<HtmlState>,
    auth: AuthSessionType,
    session: SessionType,
    Form(form): Form<SigninParams>,
) -> Result<impl IntoResponse, HtmlError> {
    let Some(user) = User::authenticate(&form.username, &form.password, &state.db).await? else {
        info!(username = %form.username, "Rejected sign in");
        return Ok(TemplateResponse::bad_request("Invalid username or password"));
    };

    Workspace::clear(&session);
    auth.login_user(user.id);

    if form.remember_me.is_some_and(|value| value == "on") {
        auth.remember_user(true);
    }

    Ok(TemplateResponse::redirect("/"))
}
