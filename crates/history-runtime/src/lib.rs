//! Runtime layer of the watch-history workspace.
//!
//! Holds the [`session::Session`] context that ties the loaded dataset to
//! the current filter state, and the background task that reads history
//! files off the UI thread.

pub mod loader_task;
pub mod session;

pub use history_core as core;
pub use history_data as data;
