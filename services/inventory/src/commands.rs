//! Non-interactive commands
//!
//! These cover the store operations the screens do not expose: registering
//! users, updating and deleting products, and scripted listings.

use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::NewProduct;
use crate::repositories::{ProductRepository, UserRepository};

/// Register a login. Existing rows for the same username are kept and
/// reported.
pub async fn add_user(
    users: &UserRepository,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> AppResult<()> {
    let existing = users.find_by_username(username).await?;
    if !existing.is_empty() {
        warn!(username, existing = existing.len(), "Username already registered");
    }

    let id = users.register(username, password).await?;
    writeln!(out, "Registered user {} (id {})", username, id)?;
    if !existing.is_empty() {
        writeln!(
            out,
            "{} now has {} logins; any of their passwords is accepted",
            username,
            existing.len() + 1
        )?;
    }
    Ok(())
}

pub async fn add_product(
    products: &ProductRepository,
    product: &NewProduct,
    out: &mut impl Write,
) -> AppResult<()> {
    let id = products.add(product).await?;
    writeln!(out, "Added product {} (id {})", product.name, id)?;
    Ok(())
}

/// Overwrite a product. An unknown id is reported, not treated as a failure.
pub async fn update_product(
    products: &ProductRepository,
    id: i64,
    product: &NewProduct,
    out: &mut impl Write,
) -> AppResult<()> {
    if products.update(id, product).await? == 0 {
        writeln!(out, "No product with id {}", id)?;
        return Ok(());
    }
    match products.get(id).await? {
        Some(updated) => writeln!(out, "Updated {}: {}", id, updated)?,
        None => writeln!(out, "Updated {}", id)?,
    }
    Ok(())
}

pub async fn delete_product(
    products: &ProductRepository,
    id: i64,
    out: &mut impl Write,
) -> AppResult<()> {
    if products.delete(id).await? == 0 {
        writeln!(out, "No product with id {}", id)?;
    } else {
        info!(id, "Product deleted");
        writeln!(out, "Deleted product {}", id)?;
    }
    Ok(())
}

pub async fn list_products(
    products: &ProductRepository,
    json: bool,
    out: &mut impl Write,
) -> AppResult<()> {
    let rows = products.list_all().await?;
    write_listing(&rows, json, out)
}

pub async fn list_low_stock(
    products: &ProductRepository,
    threshold: i64,
    json: bool,
    out: &mut impl Write,
) -> AppResult<()> {
    let rows = products.list_below(threshold).await?;
    write_listing(&rows, json, out)
}

fn write_listing<T: Serialize + Display>(
    rows: &[T],
    json: bool,
    out: &mut impl Write,
) -> AppResult<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        writeln!(out)?;
    } else {
        for row in rows {
            writeln!(out, "{}", row)?;
        }
    }
    Ok(())
}
