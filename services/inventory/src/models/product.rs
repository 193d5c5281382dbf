//! Product model and the add-product form

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::error::FormError;

/// Product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Fields written by add and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }
}

/// One listing line: `Widget - 10 in stock - $2.50`
///
/// Prices that are whole cents get two decimals; anything finer is printed
/// as stored.
impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} in stock - $", self.name, self.quantity)?;
        if (self.price * 100.0).round() / 100.0 == self.price {
            write!(f, "{:.2}", self.price)
        } else {
            write!(f, "{}", self.price)
        }
    }
}

/// Parse a price. NaN and infinities are rejected: SQLite cannot hold them.
pub fn parse_price(raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| FormError::InvalidPrice(raw.to_string()))
}

/// Raw text of the add-product dialog, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    /// Convert the text fields into a product.
    ///
    /// The name is taken verbatim. Quantity must be an integer and price a
    /// finite number; range is not checked.
    pub fn parse(&self) -> Result<NewProduct, FormError> {
        let quantity = self
            .quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| FormError::InvalidQuantity(self.quantity.clone()))?;
        let price = parse_price(&self.price)?;

        Ok(NewProduct {
            name: self.name.clone(),
            quantity,
            price,
        })
    }
}
