//! Authentication error types

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tokengate_db::DbError;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are deliberately
    /// indistinguishable
    #[error("Incorrect username or password")]
    Unauthenticated,

    /// Missing, invalid or expired bearer token, or a token whose subject no
    /// longer resolves to a user
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Inactive user")]
    InactiveUser,

    /// Raw decode failure; folded into `Unauthorized` by the session resolver
    #[error("Invalid token")]
    InvalidToken,

    #[error("Unsupported signing algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::Unauthorized | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InactiveUser => StatusCode::BAD_REQUEST,
            AuthError::Database(DbError::Duplicate(_)) => StatusCode::CONFLICT,
            AuthError::InvalidAlgorithm(_)
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            AuthError::InvalidToken => AuthError::Unauthorized.to_string(),
            AuthError::Database(DbError::Duplicate(msg)) => msg.clone(),
            _ if status.is_server_error() => {
                error!("Authentication failure: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        if status.is_client_error() {
            debug!("Rejected request: {}", detail);
        }

        let body = axum::Json(json!({
            "detail": detail
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
