//! # Rankscope Core
//!
//! Platform-independent orchestration for a dashboard that compares two
//! ranking models, SRPR (robust) and BPR (baseline), served by a
//! recommender backend.
//!
//! This crate holds everything that is not drawing: the backend and catalog
//! contracts, the dashboard state machine, item enrichment and the view
//! models. It is shared by the desktop/web UI and the CLI.
//!
//! ## Modules
//!
//! - [`api`] - Service traits for the recommender backend and the movie catalog
//! - [`client`] - reqwest implementations of those traits (feature `http`)
//! - [`dashboard`] - Dashboard state, transitions and the async controller
//! - [`enrichment`] - Per-item catalog resolution with placeholder fallbacks
//! - [`view`] - Result list, metrics panel and comparison view models
//! - [`chart`] - Offline metrics chart data
//! - [`types`] - Wire and domain types
//! - [`config`] - Production constants and runtime configuration
//! - [`error`] - Error types for service calls and configuration
//! - [`messages`] - User-facing status strings
//! - [`metrics`] - Client-side request metrics with rolling averages

pub mod api;
pub mod chart;
#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod dashboard;
pub mod enrichment;
pub mod error;
pub mod messages;
pub mod metrics;
pub mod types;
pub mod view;

pub use api::{CatalogApi, RecommenderApi};
pub use config::DashboardConfig;
pub use dashboard::{DashboardController, DashboardState, OverlapPolicy, QueryOutcome};
pub use error::{ApiError, ConfigError};
