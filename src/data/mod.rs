//! Data persistence layer
//!
//! SQLite-backed key-value storage for presets and appearance.

mod app_state;
mod database;
mod migrations;

pub use app_state::AppStateStore;
pub use database::{Database, DatabaseError};
