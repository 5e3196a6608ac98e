//! Resolving a bearer token into the calling user

use std::sync::Arc;

use tokengate_db::{User, UserRepository};
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::TokenCodec;

/// Turns a presented token back into a user record
///
/// No state is kept between calls: each resolution decodes the token and
/// re-reads the user, so a change to the stored record applies on the next
/// request.
#[derive(Clone)]
pub struct SessionResolver {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserRepository>) -> Self {
        Self { codec, users }
    }

    /// Decode the token, read its subject and look the user up
    ///
    /// Every failure along the way is reported as `AuthError::Unauthorized`,
    /// except store failures, which propagate as they are.
    pub async fn resolve_current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_| AuthError::Unauthorized)?;

        let username = claims
            .get("sub")
            .and_then(|sub| sub.as_str())
            .ok_or_else(|| {
                debug!("Token has no subject");
                AuthError::Unauthorized
            })?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                debug!("Token subject {} does not exist", username);
                AuthError::Unauthorized
            })?;

        Ok(user)
    }

    /// Reject disabled users; active users pass through unchanged
    pub fn resolve_current_active_user(user: User) -> Result<User, AuthError> {
        if !user.is_active() {
            debug!("Rejected inactive user: {}", user.username);
            return Err(AuthError::InactiveUser);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use serde_json::json;
    use tokengate_db::{Database, NewUser};

    use crate::jwt::Claims;

    async fn setup() -> (SessionResolver, Arc<TokenCodec>, Database) {
        let db = Database::in_memory().await.unwrap();
        let codec = Arc::new(TokenCodec::new("test-secret-key", Algorithm::HS256).unwrap());
        let resolver = SessionResolver::new(codec.clone(), Arc::new(db.clone()));
        (resolver, codec, db)
    }

    async fn insert(db: &Database, username: &str, disabled: bool) -> User {
        db.insert_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: "Test User".to_string(),
            phone: "5550100".to_string(),
            disabled,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA"
                .to_string(),
        })
        .await
        .unwrap()
    }

    fn token_for(codec: &TokenCodec, username: &str, ttl: Option<Duration>) -> String {
        let mut claims = Claims::new();
        claims.insert("sub".to_string(), json!(username));
        codec.encode(&claims, ttl).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let (resolver, codec, db) = setup().await;
        let alice = insert(&db, "alice", false).await;

        let token = token_for(&codec, "alice", None);
        let user = resolver.resolve_current_user(&token).await.unwrap();

        assert_eq!(user, alice);
        assert_eq!(SessionResolver::resolve_current_active_user(user).unwrap(), alice);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (resolver, _, _) = setup().await;

        assert!(matches!(
            resolver.resolve_current_user("not-a-token").await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let (resolver, codec, db) = setup().await;
        insert(&db, "alice", false).await;

        let token = token_for(&codec, "alice", Some(Duration::seconds(-30)));
        assert!(matches!(
            resolver.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_foreign_token_is_unauthorized() {
        let (resolver, _, db) = setup().await;
        insert(&db, "alice", false).await;

        let other = TokenCodec::new("another-secret", Algorithm::HS256).unwrap();
        let token = token_for(&other, "alice", None);
        assert!(matches!(
            resolver.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_missing_subject_is_unauthorized() {
        let (resolver, codec, _) = setup().await;

        let mut claims = Claims::new();
        claims.insert("scope".to_string(), json!("read"));
        let token = codec.encode(&claims, None).unwrap();

        assert!(matches!(
            resolver.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_non_string_subject_is_unauthorized() {
        let (resolver, codec, _) = setup().await;

        let mut claims = Claims::new();
        claims.insert("sub".to_string(), json!(42));
        let token = codec.encode(&claims, None).unwrap();

        assert!(matches!(
            resolver.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized() {
        let (resolver, codec, _) = setup().await;

        let token = token_for(&codec, "ghost", None);
        assert!(matches!(
            resolver.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_disabled_user_is_inactive_not_unauthorized() {
        let (resolver, codec, db) = setup().await;
        insert(&db, "carol", true).await;

        let token = token_for(&codec, "carol", None);
        // The raw token resolves; only the active check rejects it
        let user = resolver.resolve_current_user(&token).await.unwrap();
        let err = SessionResolver::resolve_current_active_user(user).unwrap_err();

        assert!(matches!(err, AuthError::InactiveUser));
        assert_ne!(err.status_code(), AuthError::Unauthorized.status_code());
    }
}
