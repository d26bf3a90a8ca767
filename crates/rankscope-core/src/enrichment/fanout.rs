//! Concurrent enrichment of a whole result list.

use futures::future::join_all;

use super::{resolve, EnrichmentState};
use crate::api::CatalogApi;
use crate::types::{ItemId, RecommendedItem};

/// Resolves every item of a list concurrently.
///
/// Results come back in list order whatever order the lookups finish in.
/// Repeated ids are looked up once per occurrence unless `catalog` memoizes.
pub async fn enrich_items<C: CatalogApi + ?Sized>(
    catalog: &C,
    items: &[RecommendedItem],
) -> Vec<(ItemId, EnrichmentState)> {
    join_all(items.iter().map(|item| async move {
        let state = resolve(catalog, &item.item_id).await;
        (item.item_id.clone(), state)
    }))
    .await
}
