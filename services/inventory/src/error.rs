//! Custom error types for the inventory service

use common::error::DatabaseError;
use thiserror::Error;

use crate::screen::ScreenKind;

/// Rejected add-product form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Quantity must be a whole number, got {0:?}")]
    InvalidQuantity(String),

    #[error("Price must be a number, got {0:?}")]
    InvalidPrice(String),
}

/// Custom error type for the inventory service
#[derive(Error, Debug)]
pub enum AppError {
    /// Storage failure
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Action sent to a screen that does not accept it
    #[error("{action} is not available on the {screen} screen")]
    InvalidTransition {
        screen: ScreenKind,
        action: &'static str,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Terminal or output stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of a listing failed
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for inventory results
pub type AppResult<T> = Result<T, AppError>;
