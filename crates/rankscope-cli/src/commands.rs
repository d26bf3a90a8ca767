//! Subcommand implementations.
//!
//! Both commands drive the same [`DashboardController`] the UI uses, over a
//! [`SharedState`](rankscope_core::dashboard::SharedState), and turn the
//! resulting state into plain data for [`crate::output`].

use anyhow::{anyhow, bail, Result};
use rankscope_core::api::{CatalogApi, RecommenderApi};
use rankscope_core::client::{HttpCatalogClient, HttpRecommenderClient};
use rankscope_core::config::{DashboardConfig, DEFAULT_K};
use rankscope_core::dashboard::{DashboardController, DashboardState, QueryOutcome};
use rankscope_core::enrichment::{enrich_items, MemoizingCatalog};
use rankscope_core::messages::{backend_error, QUERY_UNREACHABLE};
use rankscope_core::types::{
    EnrichmentRecord, ModelFamily, OfflineMetricRecord, QueryRequest, RecommendedItem,
};
use rankscope_core::view::{comparison_view, ComparisonView};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Everything `rankscope query` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub request: QueryRequest,
    pub comparisons: Vec<ComparisonView>,
    /// Display metadata by item id; empty with `--no-enrich`.
    pub enrichment: BTreeMap<String, EnrichmentRecord>,
}

/// Fetches the offline metrics once.
pub async fn offline_metrics<R: RecommenderApi>(
    backend: R,
    config: &DashboardConfig,
) -> Result<Vec<OfflineMetricRecord>> {
    let controller = DashboardController::with_shared_state(backend, DashboardState::new(config));
    controller.load_offline_metrics().await;

    let state = controller.state().snapshot();
    if let Some(message) = state.error_message() {
        bail!("{}", message);
    }
    Ok(state.offline_metrics().to_vec())
}

/// Runs one query and builds the comparison for `families`.
pub async fn query<R: RecommenderApi>(
    backend: R,
    config: &DashboardConfig,
    user_id: &str,
    k: usize,
    families: &[ModelFamily],
) -> Result<QueryReport> {
    let request = QueryRequest::new(user_id.trim(), if k == 0 { DEFAULT_K } else { k });
    let controller = DashboardController::with_shared_state(backend, DashboardState::new(config));

    match controller.run_query(&request.user_id, request.k).await {
        QueryOutcome::Succeeded => {}
        QueryOutcome::Skipped => bail!("User id must not be empty"),
        QueryOutcome::BackendError(message) => bail!("{}", backend_error(&message)),
        QueryOutcome::Unreachable => bail!("{}", QUERY_UNREACHABLE),
        QueryOutcome::Stale => bail!("Query response was superseded"),
    }

    let state = controller.state().snapshot();
    let result = state
        .query_result()
        .ok_or_else(|| anyhow!("Backend returned no result"))?;

    let comparisons = families
        .iter()
        .map(|family| comparison_view(result, state.query_metrics(), *family))
        .collect();

    Ok(QueryReport {
        request,
        comparisons,
        enrichment: BTreeMap::new(),
    })
}

/// Items shown by `report`, each id once, in display order.
pub fn displayed_items(report: &QueryReport) -> Vec<RecommendedItem> {
    let mut seen = std::collections::HashSet::new();
    report
        .comparisons
        .iter()
        .flat_map(|comparison| comparison.lists())
        .flat_map(|list| list.entries.iter())
        .filter(|entry| seen.insert(entry.item_id.clone()))
        .map(|entry| RecommendedItem {
            item_id: entry.item_id.clone(),
            similarity: entry.similarity,
        })
        .collect()
}

/// Resolves titles and posters for every item in `report`.
pub async fn enrich<C: CatalogApi + ?Sized>(catalog: &C, report: &mut QueryReport) {
    let items = displayed_items(report);
    info!("Enriching {} items", items.len());

    report.enrichment = enrich_items(catalog, &items)
        .await
        .into_iter()
        .map(|(id, state)| {
            let record = state.record(&id);
            (id.to_string(), record)
        })
        .collect();
}

/// Backend client for `config`.
pub fn backend_client(config: &DashboardConfig) -> Result<HttpRecommenderClient> {
    Ok(HttpRecommenderClient::from_config(config)?)
}

/// Catalog client for `config`, memoized when the shared cache is enabled.
pub fn catalog_client(config: &DashboardConfig) -> Result<Box<dyn CatalogApi>> {
    let client = HttpCatalogClient::from_config(config)?;
    if config.catalog_api_key.is_none() {
        warn!("No catalog API key configured; titles fall back to item ids");
    }
    if config.share_enrichment_cache {
        Ok(Box::new(MemoizingCatalog::new(client)))
    } else {
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rankscope_core::api::{CatalogEntry, CatalogLookup};
    use rankscope_core::error::ApiError;
    use rankscope_core::types::{ItemId, QueryMetric, QueryMetrics, QueryResponse, QueryResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend answering every call with a fixed result.
    struct FixedBackend {
        offline: Result<Vec<OfflineMetricRecord>, ApiError>,
        answer: Result<QueryResponse, ApiError>,
        requests: RefCell<Vec<QueryRequest>>,
    }

    impl FixedBackend {
        fn answering(answer: Result<QueryResponse, ApiError>) -> Self {
            Self {
                offline: Ok(Vec::new()),
                answer,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl RecommenderApi for FixedBackend {
        async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError> {
            self.offline.clone()
        }

        async fn fetch_recommendations(
            &self,
            request: &QueryRequest,
        ) -> Result<QueryResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            self.answer.clone()
        }
    }

    struct TitleCatalog;

    #[async_trait(?Send)]
    impl CatalogApi for TitleCatalog {
        async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError> {
            if item_id.as_str() == "42" {
                return Ok(CatalogLookup::NotFound);
            }
            Ok(CatalogLookup::Found(CatalogEntry {
                title: format!("Movie {}", item_id),
                poster_path: Some(format!("/{}.jpg", item_id)),
            }))
        }
    }

    fn config() -> DashboardConfig {
        DashboardConfig::default()
    }

    fn items(ids: &[u64]) -> Vec<RecommendedItem> {
        ids.iter().map(|id| RecommendedItem::new(*id)).collect()
    }

    fn sample_result() -> QueryResult {
        QueryResult {
            srpr_ground_truth: items(&[7, 42]),
            srpr_lsh: items(&[7, 9]),
            bpr_ground_truth: items(&[3]),
            bpr_lsh: items(&[3, 42]),
            timings: Default::default(),
            query_metrics: QueryMetrics {
                srpr: Some(QueryMetric::new(0.8, 0.75)),
                bpr: None,
            },
        }
    }

    fn record(model: &str) -> OfflineMetricRecord {
        OfflineMetricRecord {
            model: model.to_string(),
            n_recall: 0.4,
            recall: 0.3,
            ndcg: 0.2,
            precision: None,
            map: None,
        }
    }

    #[tokio::test]
    async fn test_offline_metrics() {
        let backend = FixedBackend {
            offline: Ok(vec![record("SRPR"), record("BPR")]),
            ..FixedBackend::answering(Err(ApiError::Transport("unused".into())))
        };
        let records = offline_metrics(backend, &config())
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_offline_metrics_unreachable() {
        let backend = FixedBackend {
            offline: Err(ApiError::Transport("connection refused".into())),
            ..FixedBackend::answering(Err(ApiError::Transport("unused".into())))
        };
        let err = offline_metrics(backend, &config())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not connect"));
    }

    #[tokio::test]
    async fn test_query_builds_requested_families() {
        let backend = Rc::new(FixedBackend::answering(Ok(QueryResponse::Result(
            sample_result(),
        ))));
        let report = query(
            Rc::clone(&backend),
            &config(),
            " 5 ",
            0,
            &[ModelFamily::Bpr],
        )
        .await
        .unwrap();

        assert_eq!(report.request, QueryRequest::new("5", DEFAULT_K));
        assert_eq!(backend.requests.borrow()[0], QueryRequest::new("5", DEFAULT_K));
        assert_eq!(report.comparisons.len(), 1);
        assert_eq!(report.comparisons[0].family, ModelFamily::Bpr);
        assert!(report.comparisons[0].metrics.is_none());
    }

    #[tokio::test]
    async fn test_query_backend_error() {
        let backend = Rc::new(FixedBackend::answering(Ok(QueryResponse::Error {
            error: "User not found".to_string(),
        })));
        let err = query(Rc::clone(&backend), &config(), "999", 10, &ModelFamily::ALL)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Backend error: User not found");
    }

    #[tokio::test]
    async fn test_query_unreachable() {
        let backend = Rc::new(FixedBackend::answering(Err(ApiError::Status(503))));
        let err = query(Rc::clone(&backend), &config(), "1", 10, &ModelFamily::ALL)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), QUERY_UNREACHABLE);
    }

    #[tokio::test]
    async fn test_query_empty_user() {
        let backend = Rc::new(FixedBackend::answering(Ok(QueryResponse::Result(
            sample_result(),
        ))));
        let result = query(Rc::clone(&backend), &config(), "  ", 10, &ModelFamily::ALL).await;
        assert!(result.is_err());
        assert!(backend.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_dedups_and_falls_back() {
        let backend = Rc::new(FixedBackend::answering(Ok(QueryResponse::Result(
            sample_result(),
        ))));
        let mut report = query(Rc::clone(&backend), &config(), "1", 10, &ModelFamily::ALL)
            .await
            .unwrap();

        let ids: Vec<String> = displayed_items(&report)
            .iter()
            .map(|item| item.item_id.to_string())
            .collect();
        assert_eq!(ids, vec!["7", "42", "9", "3"]);

        enrich(&TitleCatalog, &mut report).await;
        assert_eq!(report.enrichment.len(), 4);
        assert_eq!(report.enrichment["7"].title, "Movie 7");
        assert_eq!(report.enrichment["42"].title, "ID: 42");
        assert_eq!(report.enrichment["42"].poster_url, "notfound.png");
    }
}
