//! Utility modules shared by the components.

pub mod formatting;
pub mod signal_ext;

pub use formatting::{bar_percent, format_avg_ms, format_metric_value, format_similarity};
pub use signal_ext::{DashboardSignal, SignalExt};
