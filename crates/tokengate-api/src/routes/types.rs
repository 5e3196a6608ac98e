//! Request/Response DTOs

use serde::{Deserialize, Deserializer, Serialize};
use tokengate_auth::Registration;
use tokengate_db::User;

// ==================== Auth Types ====================

/// OAuth2 password-grant form
///
/// Other fields of the form (`grant_type`, `scope`, `client_id`,
/// `client_secret`) are accepted and ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// ==================== User Types ====================

/// Registration request
///
/// Any client-supplied `id` is ignored; ids are assigned by the store.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub disabled: bool,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            phone: request.phone,
            password: request.password,
            disabled: request.disabled,
        }
    }
}

/// User response (without password hash)
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub disabled: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            disabled: user.disabled,
        }
    }
}

/// Accept phone numbers sent either as JSON strings or as bare numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Phone {
        Text(String),
        Number(i64),
    }

    Ok(match Phone::deserialize(deserializer)? {
        Phone::Text(s) => s,
        Phone::Number(n) => n.to_string(),
    })
}
