//! User model

use serde::{Deserialize, Serialize};

/// Registered login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // hex SHA-256, stored in the `password` column
}
