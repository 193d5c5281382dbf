//! Application configuration
//!
//! Defaults are overridden by `INVENTORY_*` environment variables. The
//! database location is read separately through
//! [`common::database::DatabaseConfig`].

use ::config::{Config, Environment};
use serde::Deserialize;

use crate::error::AppResult;

/// Quantity below which a product shows up in the low-stock view
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Tracing filter used when `INVENTORY_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "inventory=info,common=info";

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `INVENTORY_LOW_STOCK_THRESHOLD`
    pub low_stock_threshold: i64,
    /// `INVENTORY_LOG`, an `EnvFilter` directive string
    pub log: String,
}

impl AppConfig {
    /// Load defaults, then the process environment
    pub fn load() -> AppResult<Self> {
        let settings = Config::builder()
            .set_default("low_stock_threshold", DEFAULT_LOW_STOCK_THRESHOLD)?
            .set_default("log", DEFAULT_LOG_FILTER)?
            .add_source(Environment::with_prefix("INVENTORY").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
