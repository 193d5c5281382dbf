//! Database module for handling SQLite connections
//!
//! This module provides configuration, pool construction, schema application
//! and health checks for the local SQLite file.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use tracing::{debug, info};

/// Database file used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Configuration for the given URL with a single connection
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 1,
        }
    }

    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite URL (default: `sqlite://inventory.db`)
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 1)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                DatabaseError::Configuration(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            Err(_) => 1,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Initialize a SQLite connection pool
///
/// The database file is created when it does not exist yet.
///
/// # Arguments
///
/// * `config` - Database configuration
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    info!(url = %config.database_url, "Opening database");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(pool)
}

/// Execute each statement in order
///
/// Statements are expected to be idempotent (`CREATE TABLE IF NOT EXISTS`),
/// so this runs on every start without any version bookkeeping.
pub async fn apply_schema(pool: &SqlitePool, statements: &[&str]) -> DatabaseResult<()> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Query)?;
    }
    debug!(statements = statements.len(), "Schema applied");
    Ok(())
}

/// Check database connectivity
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if a trivial query succeeds
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}
