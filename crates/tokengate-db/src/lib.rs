//! tokengate database layer
//!
//! This crate provides the user store for tokengate, using SQLite via sqlx
//! for persistence.

pub mod error;
pub mod models;
pub mod repository;

pub use error::DbError;
pub use models::{NewUser, User};
pub use repository::{Database, UserRepository};
