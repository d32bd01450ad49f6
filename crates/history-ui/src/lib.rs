//! Terminal UI layer for the watch-history analyzer.
//!
//! Provides themes, the chart registry, header, bar chart and metric card
//! components, the upload and dashboard screens, and the main application
//! event loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod dashboard_view;
pub mod rewatch_view;
pub mod themes;
pub mod upload_view;

pub use history_core as core;
