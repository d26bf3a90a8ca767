//! Shared, memoizing catalog.
//!
//! Wraps any [`CatalogApi`] so that cards showing the same item share one
//! lookup. Concurrent lookups for the same id join the request already in
//! flight. Found and NotFound answers are kept for the lifetime of the cache;
//! errors are forgotten so the next card retries.

use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::api::{CatalogApi, CatalogLookup};
use crate::error::ApiError;
use crate::types::ItemId;

type PendingLookup = Shared<LocalBoxFuture<'static, Result<CatalogLookup, ApiError>>>;

pub struct MemoizingCatalog<C> {
    inner: Rc<C>,
    entries: RefCell<HashMap<ItemId, PendingLookup>>,
}

impl<C: CatalogApi + 'static> MemoizingCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner: Rc::new(inner),
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Number of ids with a cached or in-flight lookup.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn pending(&self, item_id: &ItemId) -> PendingLookup {
        let mut entries = self.entries.borrow_mut();
        if let Some(pending) = entries.get(item_id) {
            debug!("Catalog cache hit for {}", item_id);
            return pending.clone();
        }

        let inner = Rc::clone(&self.inner);
        let id = item_id.clone();
        let pending = async move { inner.lookup(&id).await }
            .boxed_local()
            .shared();
        entries.insert(item_id.clone(), pending.clone());
        pending
    }
}

#[async_trait(?Send)]
impl<C: CatalogApi + 'static> CatalogApi for MemoizingCatalog<C> {
    async fn lookup(&self, item_id: &ItemId) -> Result<CatalogLookup, ApiError> {
        let pending = self.pending(item_id);
        let result = pending.clone().await;

        if result.is_err() {
            let mut entries = self.entries.borrow_mut();
            // Only evict the entry this call awaited, not a newer retry
            if entries
                .get(item_id)
                .is_some_and(|current| current.ptr_eq(&pending))
            {
                entries.remove(item_id);
            }
        }
        result
    }
}
