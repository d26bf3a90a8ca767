//! User-facing strings produced by the orchestration layer.
//!
//! Connectivity failures use fixed wording; backend-reported failures are
//! passed through verbatim behind [`BACKEND_ERROR_PREFIX`], so the two are
//! always distinguishable.

/// Shown when the offline metrics cannot be loaded at startup.
pub const OFFLINE_METRICS_UNREACHABLE: &str =
    "Could not connect to the recommender backend. Make sure it is running.";

/// Shown when a recommendation query cannot reach the backend.
pub const QUERY_UNREACHABLE: &str =
    "Error connecting to the recommender backend. Make sure it is running.";

/// Prefix for errors reported by the backend itself.
pub const BACKEND_ERROR_PREFIX: &str = "Backend error: ";

/// Placeholder shown in place of the chart until offline metrics arrive.
pub const OFFLINE_METRICS_LOADING: &str = "Loading metrics...";

/// Shown while a query is in flight.
pub const QUERY_LOADING: &str = "Fetching recommendations...";

/// Formats a backend-reported error for display.
pub fn backend_error(message: &str) -> String {
    format!("{}{}", BACKEND_ERROR_PREFIX, message)
}
