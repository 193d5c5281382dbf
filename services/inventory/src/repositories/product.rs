//! Product store

use common::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::{NewProduct, Product};

/// Product repository
///
/// Every method is a single autocommitted statement.
#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a product and return its assigned id
    pub async fn add(&self, product: &NewProduct) -> DatabaseResult<i64> {
        let result = sqlx::query("INSERT INTO products (name, quantity, price) VALUES (?, ?, ?)")
            .bind(&product.name)
            .bind(product.quantity)
            .bind(product.price)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        let id = result.last_insert_rowid();
        info!(id, name = %product.name, "Product added");
        Ok(id)
    }

    /// Overwrite every field of the product with this id.
    ///
    /// Returns the number of rows changed; an unknown id changes nothing.
    pub async fn update(&self, id: i64, product: &NewProduct) -> DatabaseResult<u64> {
        let result =
            sqlx::query("UPDATE products SET name = ?, quantity = ?, price = ? WHERE id = ?")
                .bind(&product.name)
                .bind(product.quantity)
                .bind(product.price)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(DatabaseError::Query)?;

        debug!(id, rows = result.rows_affected(), "Product update");
        Ok(result.rows_affected())
    }

    /// Remove the product with this id, returning the number of rows removed
    pub async fn delete(&self, id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        debug!(id, rows = result.rows_affected(), "Product delete");
        Ok(result.rows_affected())
    }

    /// Find a product by ID
    pub async fn get(&self, id: i64) -> DatabaseResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT id, name, quantity, price FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// All products in insertion order
    pub async fn list_all(&self) -> DatabaseResult<Vec<Product>> {
        sqlx::query_as::<_, Product>("SELECT id, name, quantity, price FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Products whose quantity is strictly below `threshold`
    pub async fn list_below(&self, threshold: i64) -> DatabaseResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, price
            FROM products
            WHERE quantity < ?
            ORDER BY id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}
