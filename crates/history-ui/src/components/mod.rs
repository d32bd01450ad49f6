pub mod bar_chart;
pub mod header;
pub mod metrics;
