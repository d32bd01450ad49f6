//! Data layer of the watch-history workspace.
//!
//! Loads a Takeout export, normalizes its records into watch events, applies
//! the year/channel filters, computes the dashboard aggregations and writes
//! the rewatch CSV export.

pub mod aggregator;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod loader;
pub mod normalizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use history_core as core;
