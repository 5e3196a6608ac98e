//! User operations

use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Uniqueness of username and email is left to the table constraints so
    /// that concurrent registrations cannot both succeed.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, full_name, phone, disabled, password_hash)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(user.disabled)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, "User with this username or email"))?;

        let id: i64 = result.get("id");
        debug!("Inserted user {} with id {}", user.username, id);

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            disabled: user.disabled,
            password_hash: user.password_hash,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, full_name, phone, disabled, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }
}
