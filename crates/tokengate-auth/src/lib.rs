//! tokengate authentication
//!
//! This crate provides password hashing, JWT bearer tokens, credential
//! checking and the resolution of a bearer token back into an active user.

pub mod authenticator;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod password;
pub mod session;

pub use authenticator::{Authenticator, Registration};
pub use error::AuthError;
pub use extract::{CurrentActiveUser, CurrentUser, extract_bearer_token};
pub use jwt::{Claims, DEFAULT_TOKEN_TTL_MINUTES, TokenCodec, parse_algorithm};
pub use password::{PasswordHasher, PasswordScheme};
pub use session::SessionResolver;
