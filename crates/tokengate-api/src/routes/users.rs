//! Registration and the authenticated user resource

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tokengate_auth::CurrentActiveUser;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::MAX_PASSWORD_LENGTH;
use super::types::{RegisterRequest, UserResponse};

// ==================== Input Validation ====================

/// Maximum allowed username length in bytes
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed length of the free-text fields in bytes
const MAX_FIELD_LENGTH: usize = 256;

/// Check that a required field is present and bounded
fn validate_field(field: &str, value: &str, max_len: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} cannot be empty", field)));
    }
    if value.len() > max_len {
        return Err(ApiError::BadRequest(format!(
            "{} exceeds maximum length of {} bytes",
            field, max_len
        )));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} bytes",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== User Routes ====================

/// GET /users/me/
async fn read_users_me(CurrentActiveUser(user): CurrentActiveUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// POST /users/register/
async fn register_user(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(request) = request?;

    validate_field("Username", &request.username, MAX_USERNAME_LENGTH)?;
    validate_password(&request.password)?;
    validate_field("Email", &request.email, MAX_FIELD_LENGTH)?;
    validate_field("Full name", &request.full_name, MAX_FIELD_LENGTH)?;
    validate_field("Phone", &request.phone, MAX_FIELD_LENGTH)?;

    debug!("Registering user: {}", request.username);

    let user = state.authenticator.register(request.into()).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me/", get(read_users_me))
        .route("/users/me", get(read_users_me))
        .route("/users/register/", post(register_user))
        .route("/users/register", post(register_user))
}
