//! Rankscope - side-by-side comparison of two recommendation models.
//!
//! A Dioxus front end (desktop, web, mobile) over `rankscope-core`. It shows
//! the offline quality metrics of the SRPR (robust) and BPR (baseline)
//! models, runs on-demand recommendation queries against the recommender
//! backend, and renders brute-force and LSH result lists per model with
//! posters and titles from the movie catalog.
//!
//! # Architecture
//!
//! - **State**: one [`DashboardState`](rankscope_core::dashboard::DashboardState)
//!   held in a signal and driven by the core controller
//! - **Services**: reqwest clients for the backend and the catalog, provided
//!   through Dioxus context
//! - **Enrichment**: every movie card resolves its own item against the catalog

#![forbid(unsafe_code)]

pub mod components;
pub mod utils;
