//! Tables owned by the inventory service

use common::database::apply_schema;
use common::error::DatabaseResult;
use sqlx::SqlitePool;

const CREATE_PRODUCTS: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        quantity INTEGER,
        price REAL
    )
"#;

// No UNIQUE on username: duplicate registrations are allowed.
const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT,
        password TEXT
    )
"#;

/// Create the `products` and `users` tables if they are missing
pub async fn ensure_schema(pool: &SqlitePool) -> DatabaseResult<()> {
    apply_schema(pool, &[CREATE_PRODUCTS, CREATE_USERS]).await
}
