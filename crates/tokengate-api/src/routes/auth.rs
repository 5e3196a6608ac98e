//! Token issuance

use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    routing::post,
};
use tokengate_auth::AuthError;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginForm, TokenResponse};

/// Maximum allowed password length in bytes (prevent DoS with very large passwords)
pub(crate) const MAX_PASSWORD_LENGTH: usize = 256;

/// POST /token
async fn login_for_access_token(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(form) = form?;

    // Registration caps passwords at the same length, so nothing longer can match
    if form.password.len() > MAX_PASSWORD_LENGTH {
        debug!("Rejecting over-long password for user: {}", form.username);
        return Err(AuthError::Unauthenticated.into());
    }

    let user = state
        .authenticator
        .authenticate(&form.username, &form.password)
        .await?;

    let access_token = state
        .authenticator
        .issue_token(&user, Some(state.access_token_ttl))?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/token", post(login_for_access_token))
}
