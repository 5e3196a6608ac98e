//! Credential checking, registration and token issuance

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use tokengate_db::{NewUser, User, UserRepository};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::jwt::{Claims, TokenCodec};
use crate::password::PasswordHasher;

/// Plaintext used to build the hash checked for unknown usernames
const DUMMY_PASSWORD: &str = "tokengate-timing-equalizer";

/// Details of a user being registered
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub password: String,
    pub disabled: bool,
}

/// Orchestrates the user store, password hasher and token codec
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    dummy_hash: String,
}

impl Authenticator {
    /// Create a new authenticator
    ///
    /// Hashes a throwaway password once so that lookups of unknown users cost
    /// as much as lookups of known ones.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            users,
            hasher,
            codec,
            dummy_hash,
        })
    }

    /// Check a username/password pair
    ///
    /// An unknown user and a wrong password both yield
    /// `AuthError::Unauthenticated`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        debug!("Login attempt for user: {}", username);

        let user = self.users.find_by_username(username).await?;

        // Always run a verification, against a dummy hash if needed
        let hash_to_verify = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let password_valid = self.hasher.verify(password, hash_to_verify);

        match (user, password_valid) {
            (Some(user), true) => Ok(user),
            _ => Err(AuthError::Unauthenticated),
        }
    }

    /// Register a new user, hashing the supplied password
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let password_hash = self.hasher.hash(&registration.password)?;

        let user = self
            .users
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                full_name: registration.full_name,
                phone: registration.phone,
                disabled: registration.disabled,
                password_hash,
            })
            .await?;

        info!("Registered user: {}", user.username);
        Ok(user)
    }

    /// Mint a bearer token whose subject is the user's username
    pub fn issue_token(&self, user: &User, expires_delta: Option<Duration>) -> Result<String, AuthError> {
        let mut claims = Claims::new();
        claims.insert("sub".to_string(), json!(user.username));

        self.codec.encode(&claims, expires_delta)
    }
}
