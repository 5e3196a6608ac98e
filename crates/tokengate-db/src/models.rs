//! Database models

use serde::Serialize;
use sqlx::Row;

/// User model
///
/// This is the full stored record. The password hash is never serialized;
/// outward-facing views are built from this type.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub disabled: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub disabled: bool,
    /// Already-hashed password (PHC string)
    pub password_hash: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            disabled: row.try_get("disabled")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}
