//! Single-user inventory manager
//!
//! A login gate backed by a local credential table, CRUD over a product
//! table and a low-stock query, driven by an explicit screen state machine.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod repositories;
pub mod schema;
pub mod screen;
pub mod terminal;
