//! API routes

mod auth;
mod health;
pub mod types;
mod users;

use axum::Router;

use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Token issuance
        .merge(auth::routes())
        // Registration and the authenticated user resource
        .merge(users::routes())
        .with_state(state)
}
