use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::storage::types::user::User;

use crate::AuthSessionType;

use super::response_middleware::TemplateResponse;

/// The signed-in user, placed in the request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(RequireUser)
            .ok_or_else(|| TemplateResponse::redirect("/signin").into_response())
    }
}

pub async fn require_auth(auth: AuthSessionType, mut request: Request, next: Next) -> Response {
    match auth.current_user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => TemplateResponse::redirect("/signin").into_response(),
    }
}
