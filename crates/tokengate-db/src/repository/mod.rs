//! Database repository implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::error::DbError;
use crate::models::{NewUser, User};

// Submodules
mod users;

/// User lookup and creation
///
/// Implementations must treat a missing user as `Ok(None)`, never as an
/// error, and must reject duplicate usernames or emails with
/// `DbError::Duplicate`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Insert a new user with all fields as given
    async fn create(&self, user: NewUser) -> Result<User, DbError>;
}

/// Database connection and operations
///
/// Every query checks a connection out of the pool and hands it back when
/// the query future completes or is dropped.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Create a private in-memory database
    ///
    /// An in-memory SQLite database lives only as long as its connection, so
    /// the pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                disabled INTEGER NOT NULL DEFAULT 0,
                password_hash TEXT NOT NULL CHECK (password_hash <> '')
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_users_full_name ON users(full_name)",
            "CREATE INDEX IF NOT EXISTS idx_users_phone ON users(phone)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }

        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }
}
