use axum::{extract::State, response::IntoResponse, Form};
use axum_htmx::HxBoosted;
use serde::Deserialize;

use common::storage::types::user::User;

use crate::{
    html_state::HtmlState,
    middlewares::response_middleware::{HtmlError, TemplateResponse},
    workspace::Workspace,
    AuthSessionType, SessionType,
};

#[derive(Deserialize)]
pub struct SignupParams {
    pub username: String,
    pub password: String,
}

pub async fn show_signup_form(
    auth: AuthSessionType,
    HxBoosted(boosted): HxBoosted,
) -> Result<impl IntoResponse, HtmlError> {
    if auth.is_authenticated() {
        return Ok(TemplateResponse::redirect("/"));
    }

    if boosted {
        Ok(TemplateResponse::new_partial("auth/signup.html", "body", ()))
    } else {
        Ok(TemplateResponse::new_template("auth/signup.html", ()))
    }
}

/// Registers the account and signs it in straight away.
pub async fn process_signup(
    State(state): State<HtmlState>,
    auth: AuthSessionType,
    session: SessionType,
    Form(form): Form<SignupParams>,
) -> Result<impl IntoResponse, HtmlError> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Ok(TemplateResponse::bad_request(
            "Username and password are required",
        ));
    }

    let Some(user) = User::create_new(form.username, form.password, &state.db).await? else {
        return Ok(TemplateResponse::bad_request("Username already exists"));
    };

    Workspace::clear(&session);
    auth.login_user(user.id);

    Ok(TemplateResponse::redirect("/"))
}
