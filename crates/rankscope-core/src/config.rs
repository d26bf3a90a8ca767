//! Production configuration constants and runtime configuration.
//!
//! Constants describe the fixed service contracts (endpoints, image hosts,
//! defaults). [`DashboardConfig`] carries the values that differ between
//! deployments and can be overridden from the environment.
//!
//! # Usage
//!
//! ```
//! use rankscope_core::config::{DashboardConfig, DEFAULT_K};
//!
//! let config = DashboardConfig::default();
//! assert_eq!(config.default_k, DEFAULT_K);
//! ```

use serde::{Deserialize, Serialize};

use crate::dashboard::OverlapPolicy;
use crate::error::ConfigError;

// =============================================================================
// Recommender backend
// =============================================================================

/// Where the recommender backend listens by default.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Offline metrics endpoint, relative to the backend URL.
pub const METRICS_PATH: &str = "/api/metrics";

/// Recommendation endpoint, relative to the backend URL.
pub const RECOMMEND_PATH: &str = "/api/recommend";

/// Top-K used when the form holds no usable value.
///
/// Matches the backend, which also substitutes 10 for `k <= 0`.
pub const DEFAULT_K: usize = 10;

/// User id pre-filled in the query form.
pub const DEFAULT_USER_ID: &str = "1";

/// K the offline metrics were computed with (used in chart labels).
pub const OFFLINE_METRICS_K: usize = 10;

// =============================================================================
// Movie catalog
// =============================================================================

/// Base URL of the movie catalog API.
pub const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";

/// Locale requested from the catalog.
pub const DEFAULT_CATALOG_LANGUAGE: &str = "es-ES";

/// Prefix prepended to a catalog `poster_path`.
pub const POSTER_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w200";

/// Generated placeholder image; the text to draw goes in the `text` query parameter.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://via.placeholder.com/150x225.png";

/// Image shown for items the catalog does not know.
pub const NOT_FOUND_POSTER: &str = "notfound.png";

// =============================================================================
// HTTP
// =============================================================================

/// Per-request timeout for native clients.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("rankscope/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Environment overrides
// =============================================================================

pub const BACKEND_URL_ENV: &str = "RANKSCOPE_BACKEND_URL";
pub const CATALOG_URL_ENV: &str = "RANKSCOPE_CATALOG_URL";
pub const CATALOG_API_KEY_ENV: &str = "RANKSCOPE_CATALOG_API_KEY";
/// Accepted as a fallback for [`CATALOG_API_KEY_ENV`].
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";
pub const CATALOG_LANGUAGE_ENV: &str = "RANKSCOPE_CATALOG_LANGUAGE";
pub const OVERLAP_POLICY_ENV: &str = "RANKSCOPE_OVERLAP_POLICY";
pub const SHARE_CACHE_ENV: &str = "RANKSCOPE_SHARE_ENRICHMENT_CACHE";

/// Runtime configuration for the dashboard, its clients and front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub catalog_url: String,
    /// Catalog access credential; lookups are still attempted without one
    /// (the catalog answers with a non-success status, rendered as not found)
    pub catalog_api_key: Option<String>,
    pub catalog_language: String,
    pub default_user_id: String,
    pub default_k: usize,
    pub request_timeout_secs: u64,
    pub overlap_policy: OverlapPolicy,
    /// Share one memoizing catalog across all movie cards
    pub share_enrichment_cache: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_api_key: None,
            catalog_language: DEFAULT_CATALOG_LANGUAGE.to_string(),
            default_user_id: DEFAULT_USER_ID.to_string(),
            default_k: DEFAULT_K,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            overlap_policy: OverlapPolicy::default(),
            share_enrichment_cache: false,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `RANKSCOPE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(BACKEND_URL_ENV) {
            config.backend_url = url;
        }
        if let Some(url) = get(CATALOG_URL_ENV) {
            config.catalog_url = url;
        }
        if let Some(key) = get(CATALOG_API_KEY_ENV).or_else(|| get(TMDB_API_KEY_ENV)) {
            config.catalog_api_key = Some(key);
        }
        if let Some(language) = get(CATALOG_LANGUAGE_ENV) {
            config.catalog_language = language;
        }
        if let Some(policy) = get(OVERLAP_POLICY_ENV) {
            config.overlap_policy =
                policy
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: OVERLAP_POLICY_ENV.to_string(),
                        value: policy.clone(),
                    })?;
        }
        if let Some(flag) = get(SHARE_CACHE_ENV) {
            config.share_enrichment_cache = parse_flag(&flag).ok_or(ConfigError::InvalidValue {
                name: SHARE_CACHE_ENV.to_string(),
                value: flag.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that both base URLs are absolute http(s) URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for base in [&self.backend_url, &self.catalog_url] {
            let parsed = url::Url::parse(base)
                .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base, e)))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ConfigError::InvalidUrl(format!(
                    "{}: unsupported scheme {}",
                    base,
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.catalog_language, "es-ES");
        assert_eq!(config.default_k, 10);
        assert_eq!(config.overlap_policy, OverlapPolicy::LatestRequestWins);
        assert!(!config.share_enrichment_cache);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (BACKEND_URL_ENV, "http://10.0.0.5:9000"),
            (TMDB_API_KEY_ENV, "secret"),
            (CATALOG_LANGUAGE_ENV, "en-US"),
            (OVERLAP_POLICY_ENV, "last-response"),
            (SHARE_CACHE_ENV, "true"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "http://10.0.0.5:9000");
        assert_eq!(config.catalog_api_key.as_deref(), Some("secret"));
        assert_eq!(config.catalog_language, "en-US");
        assert_eq!(config.overlap_policy, OverlapPolicy::LastResponseWins);
        assert!(config.share_enrichment_cache);
    }

    #[test]
    fn test_primary_key_wins_over_fallback() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (CATALOG_API_KEY_ENV, "primary"),
            (TMDB_API_KEY_ENV, "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = DashboardConfig::from_lookup(lookup_from(&[(OVERLAP_POLICY_ENV, "random")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = DashboardConfig::from_lookup(lookup_from(&[(BACKEND_URL_ENV, "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_blank_values_ignored() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[(BACKEND_URL_ENV, "  ")])).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }
}
