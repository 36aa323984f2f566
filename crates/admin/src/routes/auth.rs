//! Authentication route handlers for admin.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{clear_current_admin, login_rate_limiter, set_current_admin};
use crate::models::AdminSession;
use crate::state::AppState;


/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    error: Option<String>,
}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router. Only password submissions are rate limited.
pub fn router() -> Router<AppState> {
    let submit = post(login_submit);
    let submit = match login_rate_limiter() {
        Some(limiter) => submit.layer(limiter),
        None => {
            tracing::warn!("Login rate limiter unavailable; continuing without it");
            submit
        }
    };

    Router::new()
        .route("/auth/login", get(login_page).merge(submit))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page() -> impl IntoResponse {
    LoginPageTemplate { error: None }
}

/// Verify the password and start a session.
///
/// POST /auth/login
#[instrument(skip(state, session, form))]
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !state.verifier().verify(&form.password) {
        tracing::warn!("Rejected back office login");
        let page = LoginPageTemplate {
            error: Some("Senha incorreta.".to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    }

    set_current_admin(&session, &AdminSession::start()).await?;
    tracing::info!("Back office login");
    Ok(Redirect::to("/").into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "Failed to clear session on logout");
    }
    Redirect::to("/auth/login")
}
