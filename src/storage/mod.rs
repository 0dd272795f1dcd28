//! SQLite storage module for synced player data
//!
//! Provides persistent storage for scraped player bios and
//! season-level per-game statistics.

pub mod repository;
pub mod schema;

pub use repository::{PlayerRepository, StoredPlayer, UpsertOutcome};
