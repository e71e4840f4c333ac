use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use axum_htmx::{HxRequest, HX_REDIRECT, HX_TRIGGER};
use common::{
    error::AppError,
    storage::types::user::User,
    utils::template_engine::{ProvidesTemplateEngine, Value},
};
use minijinja::{context, value::ValueKind};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AuthSessionType;

/// Headers a handler may set that survive template rendering.
const HTMX_HEADERS_TO_FORWARD: &[&str] = &["HX-Push", "HX-Trigger", "HX-Redirect"];

#[derive(Clone, Debug)]
pub enum TemplateKind {
    Full(String),
    Partial(String, String),
    Error(StatusCode),
    Redirect(String),
}

/// A deferred page render. Handlers return it and [`with_template_response`]
/// turns it into HTML once the signed-in user is known.
#[derive(Clone)]
pub struct TemplateResponse {
    template_kind: TemplateKind,
    context: Value,
}

impl TemplateResponse {
    pub fn new_template<T: Serialize>(name: impl Into<String>, context: T) -> Self {
        Self {
            template_kind: TemplateKind::Full(name.into()),
            context: Value::from_serialize(&context),
        }
    }

    pub fn new_partial<T: Serialize>(
        template: impl Into<String>,
        block: impl Into<String>,
        context: T,
    ) -> Self {
        Self {
            template_kind: TemplateKind::Partial(template.into(), block.into()),
            context: Value::from_serialize(&context),
        }
    }

    pub fn error(status: StatusCode, title: &str, description: &str) -> Self {
        Self {
            template_kind: TemplateKind::Error(status),
            context: context! {
                status_code => status.as_u16(),
                title => title,
                description => description
            },
        }
    }

    pub fn not_found() -> Self {
        Self::error(
            StatusCode::NOT_FOUND,
            "Page Not Found",
            "The page you're looking for doesn't exist.",
        )
    }

    pub fn server_error() -> Self {
        Self::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Something went wrong on our end.",
        )
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::error(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::error(StatusCode::BAD_REQUEST, "Bad Request", message)
    }

    pub fn redirect(path: impl Into<String>) -> Self {
        Self {
            template_kind: TemplateKind::Redirect(path.into()),
            context: Value::from_serialize(()),
        }
    }

    fn context_str(&self, key: &str, fallback: &str) -> String {
        self.context
            .get_attr(key)
            .ok()
            .and_then(|value| value.as_str().map(String::from))
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl IntoResponse for TemplateResponse {
    fn into_response(self) -> Response {
        Extension(self).into_response()
    }
}

#[derive(Serialize)]
struct TemplateUser {
    id: String,
    username: String,
}

impl From<&User> for TemplateUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Serialize)]
struct ContextWrapper<'a> {
    is_authenticated: bool,
    user: Option<&'a TemplateUser>,
    #[serde(flatten)]
    context: HashMap<String, Value>,
}

pub async fn with_template_response<S>(
    State(state): State<S>,
    HxRequest(is_htmx): HxRequest,
    req: Request,
    next: Next,
) -> Response
where
    S: ProvidesTemplateEngine + Clone + Send + Sync + 'static,
{
    let current_user = req
        .extensions()
        .get::<AuthSessionType>()
        .and_then(|auth| auth.current_user.as_ref())
        .map(TemplateUser::from);

    let response = next.run(req).await;

    let Some(template_response) = response.extensions().get::<TemplateResponse>().cloned() else {
        return response;
    };

    let context_map = match context_to_map(&template_response.context) {
        Ok(map) => map,
        Err(kind) => {
            error!(
                "Template context must be a map or unit, got kind={:?} for template_kind={:?}",
                kind, template_response.template_kind
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(fallback_error())).into_response();
        }
    };
    let context = Value::from_serialize(&ContextWrapper {
        is_authenticated: current_user.is_some(),
        user: current_user.as_ref(),
        context: context_map,
    });
    let template_engine = state.template_engine();

    match &template_response.template_kind {
        TemplateKind::Full(name) => match template_engine.render(name, &context) {
            Ok(html) => with_forwarded_headers(Html(html).into_response(), response.headers()),
            Err(e) => {
                error!("Failed to render template '{}': {:?}", name, e);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(fallback_error())).into_response()
            }
        },
        TemplateKind::Partial(template, block) => {
            match template_engine.render_block(template, block, &context) {
                Ok(html) => with_forwarded_headers(Html(html).into_response(), response.headers()),
                Err(e) => {
                    error!("Failed to render block '{}/{}': {:?}", template, block, e);
                    (StatusCode::INTERNAL_SERVER_ERROR, Html(fallback_error())).into_response()
                }
            }
        }
        TemplateKind::Error(status) => {
            if is_htmx {
                // Boosted requests keep the current page and show a toast instead.
                let trigger = json!({"toast": {
                    "title": template_response.context_str("title", "Error"),
                    "description": template_response.context_str("description", "An error occurred."),
                    "type": "error"
                }});
                (StatusCode::NO_CONTENT, [(HX_TRIGGER, trigger.to_string())], "").into_response()
            } else {
                match template_engine.render("errors/error.html", &context) {
                    Ok(html) => (*status, Html(html)).into_response(),
                    Err(e) => {
                        error!("Critical: Failed to render 'errors/error.html': {:?}", e);
                        (*status, Html(fallback_error())).into_response()
                    }
                }
            }
        }
        TemplateKind::Redirect(path) => {
            if is_htmx {
                (StatusCode::OK, [(HX_REDIRECT, path.as_str())], "").into_response()
            } else {
                Redirect::to(path).into_response()
            }
        }
    }
}

fn context_to_map(value: &Value) -> Result<HashMap<String, Value>, ValueKind> {
    match value.kind() {
        ValueKind::Map => {
            let mut map = HashMap::new();
            if let Ok(keys) = value.try_iter() {
                for key in keys {
                    if let Ok(val) = value.get_item(&key) {
                        map.insert(key.to_string(), val);
                    }
                }
            }
            Ok(map)
        }
        ValueKind::None | ValueKind::Undefined => Ok(HashMap::new()),
        other => Err(other),
    }
}

fn with_forwarded_headers(mut response: Response, from: &HeaderMap) -> Response {
    for &header_name in HTMX_HEADERS_TO_FORWARD {
        if let Ok(name) = HeaderName::from_bytes(header_name.as_bytes()) {
            if let Some(value) = from.get(&name) {
                response.headers_mut().insert(name, value.clone());
            }
        }
    }
    response
}

#[derive(Debug)]
pub enum HtmlError {
    AppError(AppError),
    TemplateError(String),
}

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        Self::AppError(err)
    }
}

impl From<surrealdb::Error> for HtmlError {
    fn from(err: surrealdb::Error) -> Self {
        Self::AppError(AppError::from(err))
    }
}

impl From<minijinja::Error> for HtmlError {
    fn from(err: minijinja::Error) -> Self {
        Self::TemplateError(err.to_string())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        match self {
            Self::AppError(err) => match err {
                AppError::NotFound(_) => TemplateResponse::not_found().into_response(),
                AppError::Auth(msg) => TemplateResponse::unauthorized(&msg).into_response(),
                AppError::Validation(msg) => TemplateResponse::bad_request(&msg).into_response(),
                _ => {
                    error!("Internal error: {:?}", err);
                    TemplateResponse::server_error().into_response()
                }
            },
            Self::TemplateError(err) => {
                error!("Template error: {}", err);
                TemplateResponse::server_error().into_response()
            }
        }
    }
}

fn fallback_error() -> String {
    r#"
    <html>
        <body>
            <main class="container">
                <h1>Error</h1>
                <p>Sorry, something went wrong displaying this page.</p>
            </main>
        </body>
    </html>
    "#
    .to_string()
}
