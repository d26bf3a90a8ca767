//! Configuration resolution for the CLI.
//!
//! Starts from `RANKSCOPE_*` environment variables (see
//! [`DashboardConfig::from_env`]) and applies command-line flags on top.

use anyhow::{Context, Result};
use rankscope_core::config::DashboardConfig;

/// Flags that override the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub backend: Option<String>,
    pub catalog_key: Option<String>,
    pub language: Option<String>,
}

/// Environment configuration with `overrides` applied.
pub fn resolve(overrides: &Overrides) -> Result<DashboardConfig> {
    resolve_with(overrides, |name| std::env::var(name).ok())
}

/// Same as [`resolve`] with an injectable variable source.
pub fn resolve_with<F>(overrides: &Overrides, lookup: F) -> Result<DashboardConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config =
        DashboardConfig::from_lookup(lookup).context("Invalid RANKSCOPE_* environment")?;

    if let Some(backend) = &overrides.backend {
        config.backend_url = backend.clone();
    }
    if let Some(key) = &overrides.catalog_key {
        config.catalog_api_key = Some(key.clone());
    }
    if let Some(language) = &overrides.language {
        config.catalog_language = language.clone();
    }

    config
        .validate()
        .with_context(|| format!("Invalid backend URL: {}", config.backend_url))?;
    Ok(config)
}
