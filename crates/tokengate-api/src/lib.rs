//! tokengate REST API
//!
//! This crate provides the Axum-based HTTP surface for tokengate: token
//! issuance, registration and the authenticated `/users/me/` resource.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
