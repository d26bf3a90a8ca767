//! In-memory service fakes shared by the integration tests.
//!
//! Both fakes hand out answers through oneshot channels so a test decides
//! exactly when, and in which order, each request completes.

#![allow(dead_code)]

use async_trait::async_trait;
use futures_channel::oneshot;
use rankscope_core::api::{CatalogApi, CatalogEntry, CatalogLookup, RecommenderApi};
use rankscope_core::error::ApiError;
use rankscope_core::types::{
    ItemId, OfflineMetricRecord, QueryMetric, QueryMetrics, QueryRequest, QueryResponse,
    QueryResult, QueryTimings, RecommendedItem,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

pub type QueryAnswer = Result<QueryResponse, ApiError>;
pub type LookupAnswer = Result<CatalogLookup, ApiError>;

// ============================================================================
// Recommender backend
// ============================================================================

#[derive(Default)]
pub struct ScriptedBackend {
    offline: RefCell<Option<Result<Vec<OfflineMetricRecord>, ApiError>>>,
    pending: RefCell<VecDeque<oneshot::Receiver<QueryAnswer>>>,
    requests: RefCell<Vec<QueryRequest>>,
    offline_calls: RefCell<usize>,
}

impl ScriptedBackend {
    pub fn with_offline(result: Result<Vec<OfflineMetricRecord>, ApiError>) -> Self {
        let backend = Self::default();
        *backend.offline.borrow_mut() = Some(result);
        backend
    }

    /// Queues the answer slot for the next query; send on the returned
    /// sender to complete it.
    pub fn expect_query(&self) -> oneshot::Sender<QueryAnswer> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(rx);
        tx
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len() + *self.offline_calls.borrow()
    }
}

#[async_trait(?Send)]
impl RecommenderApi for ScriptedBackend {
    async fn fetch_offline_metrics(&self) -> Result<Vec<OfflineMetricRecord>, ApiError> {
        *self.offline_calls.borrow_mut() += 1;
        self.offline
            .borrow()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Transport("no offline metrics scripted".into())))
    }

    async fn fetch_recommendations(&self, request: &QueryRequest) -> QueryAnswer {
        self.requests.borrow_mut().push(request.clone());
        let slot = self.pending.borrow_mut().pop_front();
        match slot {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("answer dropped".into()))),
            None => Err(ApiError::Transport("no answer scripted".into())),
        }
    }
}

// ============================================================================
// Movie catalog
// ============================================================================

/// Catalog whose lookups wait for a per-id answer.
#[derive(Default)]
pub struct GatedCatalog {
    gates: RefCell<HashMap<ItemId, oneshot::Receiver<LookupAnswer>>>,
    lookups: RefCell<Vec<ItemId>>,
}

impl GatedCatalog {
    pub fn gate(&self, item_id: impl Into<ItemId>) -> oneshot::Sender<LookupAnswer> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(item_id.into(), rx);
        tx
    }

    pub fn lookups(&self) -> Vec<ItemId> {
        self.lookups.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CatalogApi for GatedCatalog {
    async fn lookup(&self, item_id: &ItemId) -> LookupAnswer {
        self.lookups.borrow_mut().push(item_id.clone());
        let gate = self.gates.borrow_mut().remove(item_id);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".into()))),
            None => Ok(CatalogLookup::NotFound),
        }
    }
}

/// Catalog answering immediately from a fixed table; unknown ids are not found.
#[derive(Default)]
pub struct TableCatalog {
    pub entries: HashMap<ItemId, CatalogEntry>,
    pub unreachable: Vec<ItemId>,
}

#[async_trait(?Send)]
impl CatalogApi for TableCatalog {
    async fn lookup(&self, item_id: &ItemId) -> LookupAnswer {
        if self.unreachable.contains(item_id) {
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(match self.entries.get(item_id) {
            Some(entry) => CatalogLookup::Found(entry.clone()),
            None => CatalogLookup::NotFound,
        })
    }
}

// ============================================================================
// Payloads
// ============================================================================

pub fn found(title: &str, poster_path: Option<&str>) -> LookupAnswer {
    Ok(CatalogLookup::Found(CatalogEntry {
        title: title.to_string(),
        poster_path: poster_path.map(str::to_string),
    }))
}

/// The reference payload: one SRPR ground-truth item and metrics for both families.
pub fn reference_result() -> QueryResult {
    QueryResult {
        srpr_ground_truth: vec![RecommendedItem::new(7u64)],
        srpr_lsh: vec![],
        bpr_ground_truth: vec![],
        bpr_lsh: vec![],
        timings: QueryTimings {
            srpr_brute_force_ms: 12.5,
            srpr_lsh_ms: 1.2,
            bpr_brute_force_ms: 10.0,
            bpr_lsh_ms: 0.9,
        },
        query_metrics: QueryMetrics {
            srpr: Some(QueryMetric::new(0.8, 0.75)),
            bpr: Some(QueryMetric::new(0.6, 0.5)),
        },
    }
}

/// A result whose SRPR ground truth is the single item `marker`.
pub fn result_marked(marker: u64) -> QueryAnswer {
    let mut result = reference_result();
    result.srpr_ground_truth = vec![RecommendedItem::new(marker)];
    Ok(QueryResponse::Result(result))
}

pub fn offline_records() -> Vec<OfflineMetricRecord> {
    vec![
        OfflineMetricRecord {
            model: "LSH + SRPR (Robusto)".to_string(),
            n_recall: 0.41,
            recall: 0.38,
            ndcg: 0.33,
            precision: Some(0.12),
            map: Some(0.2),
        },
        OfflineMetricRecord {
            model: "LSH + BPR (No Robusto)".to_string(),
            n_recall: 0.29,
            recall: 0.27,
            ndcg: 0.22,
            precision: None,
            map: None,
        },
    ]
}
