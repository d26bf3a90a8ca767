//! reqwest client for the movie catalog.
//!
//! One lookup is `GET {catalog}/movie/{id}?api_key={key}&language={locale}`.
//! A non-success status is reported as [`CatalogLookup::NotFound`]; failing
//! to reach the catalog or to decode its answer is an [`ApiError`].

use std::time::Duration;

use async_trait::async_trait;
use instant::Instant;
use tracing::{debug, warn};

use super::{get_request, get_text, join_segments, parse_base_url, shared_client};
use crate::api::{CatalogApi, CatalogEntry, CatalogLookup};
use crate::config::{DashboardConfig, REQUEST_TIMEOUT_SECS};
use crate::error::ApiError;
use crate::metrics::{global_metrics, RequestKind};
use crate::types::ItemId;

#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    base: url::Url,
    api_key: Option<String>,
    language: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        language: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base: parse_base_url(base_url)?,
            api_key,
            language: language.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            client: shared_client(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.catalog_url,
            config.catalog_api_key.clone(),
            config.catalog_language.clone(),
        )?
        .with_timeout(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn movie_url(&self, item_id: &ItemId) -> Result<url::Url, ApiError> {
        let mut url = join_segments(&self.base, &["movie", item_id.as_str()])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                query.append_pair("api_key", key);
            }
            query.append_pair("language", &self.language);
        }
        Ok(url)
    }
}

#[async_trait(?Send)]
impl CatalogApi for HttpCatalogClient {
    async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError> {
        let url = self.movie_url(item_id)?;
        let start = Instant::now();

        let result: Result<CatalogLookup, ApiError> = async {
            let (status, body) =
                get_text(get_request(&self.client, url, self.timeout)).await?;
            if !status.is_success() {
                debug!("Catalog has no entry for {} (status {})", item_id, status);
            }
            decode_catalog_response(status, &body)
        }
        .await;

        global_metrics().record(
            RequestKind::CatalogLookup,
            start.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );
        if let Err(e) = &result {
            warn!("Catalog lookup for {} failed: {}", item_id, e);
        }
        result
    }
}

/// Decodes the answer to one catalog lookup.
///
/// Any non-success status means the catalog has no usable entry; a 2xx body
/// that is not a catalog entry is a decode error.
pub fn decode_catalog_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<CatalogLookup, ApiError> {
    if !status.is_success() {
        return Ok(CatalogLookup::NotFound);
    }
    let entry: CatalogEntry = serde_json::from_str(body)?;
    Ok(CatalogLookup::Found(entry))
}
