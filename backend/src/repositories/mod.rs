//! Database repositories
//!
//! Provides the data access layer for saved calculations.

pub mod history;

pub use history::{HistoryRepository, InMemoryHistoryRepository, SqliteHistoryRepository};
