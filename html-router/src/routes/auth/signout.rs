use axum::response::IntoResponse;

use crate::{
    middlewares::response_middleware::{HtmlError, TemplateResponse},
    workspace::Workspace,
    AuthSessionType, SessionType,
};

pub async fn sign_out_user(
    auth: AuthSessionType,
    session: SessionType,
) -> Result<impl IntoResponse, HtmlError> {
    if !auth.is_authenticated() {
        return Ok(TemplateResponse::redirect("/signin"));
    }

    auth.logout_user();
    Workspace::clear(&session);

    Ok(TemplateResponse::redirect("/signin"))
}
