//! Dashboard state and its transitions.
//!
//! [`DashboardState`] is the single source of truth for everything the
//! dashboard shows: offline metrics, the latest query result, the active
//! comparison tab, the loading flag and the error message. It is only
//! changed through the transition methods below, which keep the invariants
//! in one place:
//!
//! - `loading` is true from [`begin_query`](DashboardState::begin_query)
//!   until the matching completion is applied, and no result or error is
//!   shown while it is
//! - a successful query replaces both the result and its metrics and clears
//!   the error; a failed one clears both and sets the error
//! - under [`OverlapPolicy::LatestRequestWins`] a completion for anything but
//!   the most recently issued query is discarded
//!
//! The async side (talking to the backend) lives in [`controller`].

pub mod controller;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::messages;
use crate::types::{
    ModelFamily, OfflineMetricRecord, QueryMetrics, QueryRequest, QueryResponse, QueryResult,
};
use crate::view::{comparison_view, ComparisonView};

pub use controller::{DashboardController, SharedState, StateHandle};

/// How completions of overlapping queries are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Only the most recently issued query may update the state.
    #[default]
    #[serde(rename = "latest-request")]
    LatestRequestWins,
    /// Every completion is applied in arrival order.
    #[serde(rename = "last-response")]
    LastResponseWins,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest-request" | "latest-request-wins" => Ok(OverlapPolicy::LatestRequestWins),
            "last-response" | "last-response-wins" => Ok(OverlapPolicy::LastResponseWins),
            other => Err(format!("unknown overlap policy: {}", other)),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverlapPolicy::LatestRequestWins => "latest-request",
            OverlapPolicy::LastResponseWins => "last-response",
        })
    }
}

/// Issued by [`DashboardState::begin_query`]; hand it back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub request: QueryRequest,
}

/// What a query completion did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// No query was issued (empty user id or one already loading).
    Skipped,
    /// Result and metrics replaced.
    Succeeded,
    /// The backend answered with an error payload.
    BackendError(String),
    /// The backend could not be reached or answered unusably.
    Unreachable,
    /// A newer query had been issued; nothing changed.
    Stale,
}

impl QueryOutcome {
    /// True when the completion changed the state.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            QueryOutcome::Succeeded | QueryOutcome::BackendError(_) | QueryOutcome::Unreachable
        )
    }
}

/// Coarse phase derived from the state, for front ends that switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    offline_metrics: Vec<OfflineMetricRecord>,
    query_result: Option<QueryResult>,
    query_metrics: Option<QueryMetrics>,
    active_tab: ModelFamily,
    loading: bool,
    error_message: Option<String>,
    user_id_input: String,
    k_input: String,
    /// Top-K used when `k_input` is not a positive integer
    default_k: usize,
    /// Generation of the most recently issued query (0 = none yet)
    generation: u64,
    policy: OverlapPolicy,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            offline_metrics: Vec::new(),
            query_result: None,
            query_metrics: None,
            active_tab: ModelFamily::default(),
            loading: false,
            error_message: None,
            user_id_input: config.default_user_id.clone(),
            k_input: config.default_k.to_string(),
            default_k: config.default_k,
            generation: 0,
            policy: config.overlap_policy,
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn offline_metrics(&self) -> &[OfflineMetricRecord] {
        &self.offline_metrics
    }

    pub fn query_result(&self) -> Option<&QueryResult> {
        self.query_result.as_ref()
    }

    pub fn query_metrics(&self) -> Option<&QueryMetrics> {
        self.query_metrics.as_ref()
    }

    pub fn active_tab(&self) -> ModelFamily {
        self.active_tab
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn user_id_input(&self) -> &str {
        &self.user_id_input
    }

    pub fn k_input(&self) -> &str {
        &self.k_input
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn phase(&self) -> QueryPhase {
        if self.loading {
            QueryPhase::Loading
        } else if self.query_result.is_some() {
            QueryPhase::Succeeded
        } else if self.error_message.is_some() {
            QueryPhase::Failed
        } else {
            QueryPhase::Idle
        }
    }

    /// The form can be submitted: a user id is present and nothing is loading.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.user_id_input.trim().is_empty()
    }

    /// Request built from the current form inputs.
    pub fn form_request(&self) -> Option<QueryRequest> {
        QueryRequest::from_form(&self.user_id_input, &self.k_input, self.default_k)
    }

    /// View model of the active tab, once a result is present.
    pub fn active_comparison(&self) -> Option<ComparisonView> {
        let result = self.query_result.as_ref()?;
        Some(comparison_view(
            result,
            self.query_metrics.as_ref(),
            self.active_tab,
        ))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn set_user_id(&mut self, value: impl Into<String>) {
        self.user_id_input = value.into();
    }

    pub fn set_k(&mut self, value: impl Into<String>) {
        self.k_input = value.into();
    }

    /// Switches the comparison tab. Never touches the result or loading state.
    pub fn select_tab(&mut self, tab: ModelFamily) {
        self.active_tab = tab;
    }

    /// Applies the outcome of the one-shot offline metrics fetch.
    pub fn apply_offline_metrics(&mut self, result: Result<Vec<OfflineMetricRecord>, ApiError>) {
        match result {
            Ok(records) => self.offline_metrics = records,
            Err(_) => {
                self.offline_metrics.clear();
                self.error_message = Some(messages::OFFLINE_METRICS_UNREACHABLE.to_string());
            }
        }
    }

    /// Marks a query as in flight and returns its ticket.
    ///
    /// Returns `None` (leaving the state untouched) when the user id is empty.
    pub fn begin_query(&mut self, request: QueryRequest) -> Option<QueryTicket> {
        if request.user_id.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        self.loading = true;
        self.error_message = None;
        self.clear_result();
        Some(QueryTicket {
            generation: self.generation,
            request,
        })
    }

    /// Applies the completion of the query identified by `ticket`.
    pub fn complete_query(
        &mut self,
        ticket: &QueryTicket,
        result: Result<QueryResponse, ApiError>,
    ) -> QueryOutcome {
        if self.policy == OverlapPolicy::LatestRequestWins && ticket.generation != self.generation {
            return QueryOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(QueryResponse::Result(result)) => {
                self.query_metrics = Some(result.query_metrics);
                self.query_result = Some(result);
                self.error_message = None;
                QueryOutcome::Succeeded
            }
            Ok(QueryResponse::Error { error }) => {
                self.clear_result();
                self.error_message = Some(messages::backend_error(&error));
                QueryOutcome::BackendError(error)
            }
            Err(_) => {
                self.clear_result();
                self.error_message = Some(messages::QUERY_UNREACHABLE.to_string());
                QueryOutcome::Unreachable
            }
        }
    }

    fn clear_result(&mut self) {
        self.query_result = None;
        self.query_metrics = None;
    }
}
