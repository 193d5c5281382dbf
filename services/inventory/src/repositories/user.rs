//! Credential store

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::models::User;
use crate::password::digest_password;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a username with the digest of its password.
    ///
    /// Always inserts, even when the username is already taken. Returns the
    /// id of the new row.
    pub async fn register(&self, username: &str, password: &str) -> DatabaseResult<i64> {
        info!("Registering user: {}", username);

        let password_hash = digest_password(password);
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(&password_hash)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.last_insert_rowid())
    }

    /// True iff some row holds exactly this username and password digest
    pub async fn authenticate(&self, username: &str, password: &str) -> DatabaseResult<bool> {
        let password_hash = digest_password(password);
        let row = sqlx::query("SELECT id FROM users WHERE username = ? AND password = ? LIMIT 1")
            .bind(username)
            .bind(&password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        debug!(username, matched = row.is_some(), "Credential lookup");
        Ok(row.is_some())
    }

    /// All rows registered under a username, oldest first
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password
            FROM users
            WHERE username = ?
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let users = rows
            .into_iter()
            .map(|row| User {
                id: row.get("id"),
                username: row.get("username"),
                password_hash: row.get("password"),
            })
            .collect();

        Ok(users)
    }

    /// Number of registered rows
    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;
        Ok(row.get("total"))
    }
}
