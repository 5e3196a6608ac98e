//! Bearer-token extractors for Axum

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tokengate_db::User;
use tracing::debug;

use crate::error::AuthError;
use crate::session::SessionResolver;

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }
    Ok(token)
}

/// Extractor for the user identified by the request's bearer token
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<SessionResolver>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = Arc::<SessionResolver>::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::Unauthorized)?;

        let token = extract_bearer_token(auth_header)?;
        let user = resolver.resolve_current_user(token).await?;

        debug!("Authenticated user: {}", user.username);
        Ok(CurrentUser(user))
    }
}

/// Extractor for the current user, rejecting disabled accounts
pub struct CurrentActiveUser(pub User);

impl<S> FromRequestParts<S> for CurrentActiveUser
where
    Arc<SessionResolver>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let user = SessionResolver::resolve_current_active_user(user)?;
        Ok(CurrentActiveUser(user))
    }
}
