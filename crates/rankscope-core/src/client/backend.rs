//! reqwest client for the recommender backend.

use async_trait::async_trait;
use instant::Instant;
use tracing::{debug, warn};

use std::time::Duration;

use super::{
    ensure_success, get_request, get_text, join_segments, parse_base_url, path_segments,
    shared_client,
};
use crate::api::RecommenderApi;
use crate::config::{DashboardConfig, METRICS_PATH, RECOMMEND_PATH, REQUEST_TIMEOUT_SECS};
use crate::error::ApiError;
use crate::metrics::{global_metrics, RequestKind};
use crate::types::{OfflineMetricRecord, QueryRequest, QueryResponse};

/// Talks to `GET /api/metrics` and `GET /api/recommend` on the backend.
#[derive(Clone, Debug)]
pub struct HttpRecommenderClient {
    base: url::Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpRecommenderClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base: parse_base_url(base_url)?,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            client: shared_client(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        Ok(Self::new(&config.backend_url)?.with_timeout(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn metrics_url(&self) -> Result<url::Url, ApiError> {
        join_segments(&self.base, &path_segments(METRICS_PATH))
    }

    pub fn recommend_url(&self, request: &QueryRequest) -> Result<url::Url, ApiError> {
        let mut url = join_segments(&self.base, &path_segments(RECOMMEND_PATH))?;
        url.query_pairs_mut()
            .append_pair("user_id", &request.user_id)
            .append_pair("k", &request.k.to_string());
        Ok(url)
    }
}

#[async_trait(?Send)]
impl RecommenderApi for HttpRecommenderClient {
    async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError> {
        let url = self.metrics_url()?;
        let start = Instant::now();

        let result: Result<Vec<OfflineMetricRecord>, ApiError> = async {
            let (status, body) =
                get_text(get_request(&self.client, url.clone(), self.timeout)).await?;
            decode_offline_metrics(status, &body)
        }
        .await;

        global_metrics().record(
            RequestKind::OfflineMetrics,
            start.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );
        match &result {
            Ok(records) => debug!("Fetched {} offline metric records", records.len()),
            Err(e) => warn!("Offline metrics request to {} failed: {}", url, e),
        }
        result
    }

    async fn fetch_recommendations(
        &self,
        request: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        let url = self.recommend_url(request)?;
        let start = Instant::now();

        let result: Result<QueryResponse, ApiError> = async {
            let (status, body) =
                get_text(get_request(&self.client, url.clone(), self.timeout)).await?;
            decode_query_response(status, &body)
        }
        .await;

        global_metrics().record(
            RequestKind::Query,
            start.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );
        if let Err(e) = &result {
            warn!("Recommendation request to {} failed: {}", url, e);
        }
        result
    }
}

/// Decodes the answer to `GET /api/metrics`. A non-success status is an error.
pub fn decode_offline_metrics(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Vec<OfflineMetricRecord>, ApiError> {
    ensure_success(status)?;
    Ok(serde_json::from_str(body)?)
}

/// Decodes the answer to `GET /api/recommend`.
///
/// A non-success status is an error even when the body carries an `error`
/// field; only a 2xx `{ "error": ... }` is a backend-reported failure.
pub fn decode_query_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<QueryResponse, ApiError> {
    ensure_success(status)?;
    Ok(serde_json::from_str(body)?)
}
