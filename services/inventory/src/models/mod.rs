//! Inventory domain models

pub mod product;
pub mod user;

// Re-export for convenience
pub use product::{NewProduct, Product, ProductForm, parse_price};
pub use user::User;
