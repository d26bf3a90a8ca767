//! Async driver for [`DashboardState`].
//!
//! The controller owns a [`RecommenderApi`] and a handle to the state. Each
//! operation applies its transitions through the handle in short, synchronous
//! updates; the handle is never borrowed across an `.await`, so overlapping
//! queries interleave safely on a single-threaded executor.
//!
//! The handle is abstract so front ends can plug in their own reactive store
//! (the desktop app uses a Dioxus signal). [`SharedState`] is the plain
//! `Arc<RwLock<_>>` store used by the CLI and the tests.

use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

use super::{DashboardState, QueryOutcome};
use crate::api::RecommenderApi;
use crate::config::DEFAULT_K;
use crate::types::{ModelFamily, QueryRequest};

/// Storage for the dashboard state.
pub trait StateHandle {
    fn read_state<T>(&self, f: impl FnOnce(&DashboardState) -> T) -> T;
    fn update_state<T>(&self, f: impl FnOnce(&mut DashboardState) -> T) -> T;
}

#[derive(Clone, Debug, Default)]
pub struct SharedState(Arc<RwLock<DashboardState>>);

impl SharedState {
    pub fn new(state: DashboardState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.read_state(DashboardState::clone)
    }
}

impl StateHandle for SharedState {
    fn read_state<T>(&self, f: impl FnOnce(&DashboardState) -> T) -> T {
        // A panic inside a transition cannot leave a field half-written
        match self.0.read() {
            Ok(guard) => f(&*guard),
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }

    fn update_state<T>(&self, f: impl FnOnce(&mut DashboardState) -> T) -> T {
        match self.0.write() {
            Ok(mut guard) => f(&mut *guard),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }
}

#[derive(Clone)]
pub struct DashboardController<R, S = SharedState> {
    api: R,
    state: S,
}

impl<R: RecommenderApi> DashboardController<R, SharedState> {
    /// Controller over a fresh [`SharedState`].
    pub fn with_shared_state(api: R, state: DashboardState) -> Self {
        Self::new(api, SharedState::new(state))
    }
}

impl<R: RecommenderApi, S: StateHandle> DashboardController<R, S> {
    pub fn new(api: R, state: S) -> Self {
        Self { api, state }
    }

    pub fn api(&self) -> &R {
        &self.api
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Fetches the offline metrics once. Failures end up in the state's
    /// error message; nothing is retried.
    pub async fn load_offline_metrics(&self) {
        info!("Loading offline metrics");
        let result = self.api.fetch_offline_metrics().await;
        match &result {
            Ok(records) => info!("Loaded offline metrics for {} models", records.len()),
            Err(e) => error!("Failed to load offline metrics: {}", e),
        }
        self.state.update_state(|state| state.apply_offline_metrics(result));
    }

    /// Runs one recommendation query and applies its outcome.
    ///
    /// An empty `user_id` is a no-op. A `k` of zero is sent as the default.
    pub async fn run_query(&self, user_id: &str, k: usize) -> QueryOutcome {
        let k = if k == 0 { DEFAULT_K } else { k };
        let request = QueryRequest::new(user_id.trim(), k);

        let Some(ticket) = self.state.update_state(|state| state.begin_query(request)) else {
            debug!("Ignoring query with empty user id");
            return QueryOutcome::Skipped;
        };

        info!(
            "Running query #{} for user {} (k={})",
            ticket.generation, ticket.request.user_id, ticket.request.k
        );
        let result = self.api.fetch_recommendations(&ticket.request).await;
        let outcome = self
            .state
            .update_state(|state| state.complete_query(&ticket, result));

        match &outcome {
            QueryOutcome::Succeeded => info!("Query #{} succeeded", ticket.generation),
            QueryOutcome::BackendError(message) => {
                error!("Query #{} rejected by backend: {}", ticket.generation, message)
            }
            QueryOutcome::Unreachable => {
                error!("Query #{} could not reach the backend", ticket.generation)
            }
            QueryOutcome::Stale => {
                debug!("Discarded stale response for query #{}", ticket.generation)
            }
            QueryOutcome::Skipped => {}
        }
        outcome
    }

    /// Runs a query from the current form inputs, unless one is already loading.
    pub async fn submit(&self) -> QueryOutcome {
        let request = self.state.read_state(|state| {
            if state.can_submit() {
                state.form_request()
            } else {
                None
            }
        });

        match request {
            Some(request) => self.run_query(&request.user_id, request.k).await,
            None => {
                warn!("Submit ignored: query already loading or user id empty");
                QueryOutcome::Skipped
            }
        }
    }

    pub fn select_tab(&self, tab: ModelFamily) {
        self.state.update_state(|state| state.select_tab(tab));
    }

    pub fn set_user_id(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.update_state(|state| state.set_user_id(value));
    }

    pub fn set_k(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.update_state(|state| state.set_k(value));
    }
}
