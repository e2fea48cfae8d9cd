//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - Region catalog loaded from disk

mod database;
mod models;
mod regions;

pub use database::Database;
pub use models::*;
pub use regions::RegionCatalog;
