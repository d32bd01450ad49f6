//! Shared building blocks for the watch-history workspace.
//!
//! Holds the record model, the error type, CLI settings with persisted
//! preferences, timezone handling and display formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{HistoryError, Result};
