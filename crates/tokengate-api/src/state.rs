//! Application state

use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;
use tokengate_auth::{AuthError, Authenticator, PasswordHasher, SessionResolver, TokenCodec};
use tokengate_db::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub sessions: Arc<SessionResolver>,
    /// Lifetime of tokens issued by `POST /token`
    pub access_token_ttl: Duration,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        hasher: PasswordHasher,
        access_token_ttl: Duration,
    ) -> Result<Self, AuthError> {
        let authenticator = Arc::new(Authenticator::new(users.clone(), hasher, codec.clone())?);
        let sessions = Arc::new(SessionResolver::new(codec, users));

        Ok(Self {
            authenticator,
            sessions,
            access_token_ttl,
        })
    }
}

impl FromRef<AppState> for Arc<SessionResolver> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
