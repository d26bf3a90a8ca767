//! Service abstractions for the two external collaborators.
//!
//! The dashboard only talks to these traits, which keeps the orchestration
//! logic independent of the transport:
//!
//! - [`RecommenderApi`]: the local recommender backend (offline metrics and
//!   on-demand queries)
//! - [`CatalogApi`]: the third-party movie catalog used for enrichment
//!
//! HTTP implementations live in [`crate::client`]. Tests use in-memory fakes.
//!
//! Futures are `?Send` so the same traits work on the single-threaded
//! browser runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ApiError;
use crate::types::{ItemId, OfflineMetricRecord, QueryRequest, QueryResponse};

/// Recommender backend.
#[async_trait(?Send)]
pub trait RecommenderApi {
    /// Fetches the precomputed offline metrics, one record per model variant.
    async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError>;

    /// Runs one recommendation query.
    ///
    /// A backend-reported failure (`{ "error": ... }`) is a successful call
    /// returning [`QueryResponse::Error`]; only transport, status and decode
    /// failures are `Err`.
    async fn fetch_recommendations(&self, request: &QueryRequest)
        -> Result<QueryResponse, ApiError>;
}

/// Catalog entry for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Outcome of a catalog lookup that reached the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLookup {
    Found(CatalogEntry),
    /// The catalog answered with a non-success status
    NotFound,
}

/// Movie catalog.
#[async_trait(?Send)]
pub trait CatalogApi {
    /// Looks up one item. `Err` means the catalog could not be reached or
    /// returned an unusable body.
    async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError>;
}

#[async_trait(?Send)]
impl<T: RecommenderApi + ?Sized> RecommenderApi for Arc<T> {
    async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError> {
        (**self).fetch_offline_metrics().await
    }

    async fn fetch_recommendations(
        &self,
        request: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        (**self).fetch_recommendations(request).await
    }
}

#[async_trait(?Send)]
impl<T: RecommenderApi + ?Sized> RecommenderApi for Rc<T> {
    async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError> {
        (**self).fetch_offline_metrics().await
    }

    async fn fetch_recommendations(
        &self,
        request: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        (**self).fetch_recommendations(request).await
    }
}

#[async_trait(?Send)]
impl<T: CatalogApi + ?Sized> CatalogApi for Arc<T> {
    async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError> {
        (**self).lookup(item_id).await
    }
}

#[async_trait(?Send)]
impl<T: CatalogApi + ?Sized> CatalogApi for Rc<T> {
    async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError> {
        (**self).lookup(item_id).await
    }
}
