//! Item enrichment: turning a bare item id into a title and a poster image.
//!
//! Each displayed item is resolved independently against the catalog. The
//! outcome is an [`EnrichmentState`], which always yields a displayable
//! [`EnrichmentRecord`]; catalog failures degrade to placeholders and never
//! surface as errors.
//!
//! - [`resolve`] performs one lookup
//! - [`ItemResolution`] tracks the state of one card and ignores results for
//!   an id it no longer shows
//! - [`MemoizingCatalog`] optionally shares lookups between cards
//! - [`enrich_items`] resolves a whole list concurrently

mod cache;
mod fanout;

pub use cache::MemoizingCatalog;
pub use fanout::enrich_items;

use serde::Serialize;
use tracing::debug;

use crate::api::{CatalogApi, CatalogLookup};
use crate::config::{NOT_FOUND_POSTER, PLACEHOLDER_IMAGE_BASE, POSTER_IMAGE_BASE};
use crate::error::ApiError;
use crate::types::{EnrichmentRecord, ItemId};

/// Resolution state of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrichmentState {
    /// No answer from the catalog yet.
    Initial,
    Found {
        title: String,
        poster_path: Option<String>,
    },
    /// The catalog answered with a non-success status.
    NotFound,
    /// The catalog could not be reached or answered unusably.
    Error,
}

impl EnrichmentState {
    pub fn from_lookup(result: Result<CatalogLookup, ApiError>) -> Self {
        match result {
            Ok(CatalogLookup::Found(entry)) => EnrichmentState::Found {
                title: entry.title,
                poster_path: entry.poster_path,
            },
            Ok(CatalogLookup::NotFound) => EnrichmentState::NotFound,
            Err(_) => EnrichmentState::Error,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, EnrichmentState::Initial)
    }

    /// Display metadata for `item_id` in this state.
    pub fn record(&self, item_id: &ItemId) -> EnrichmentRecord {
        match self {
            EnrichmentState::Initial => EnrichmentRecord {
                title: fallback_title(item_id),
                poster_url: String::new(),
            },
            EnrichmentState::Found { title, poster_path } => EnrichmentRecord {
                title: title.clone(),
                poster_url: match poster_path.as_deref() {
                    Some(path) if !path.is_empty() => poster_image_url(path),
                    _ => title_placeholder_url(title),
                },
            },
            EnrichmentState::NotFound => EnrichmentRecord {
                title: fallback_title(item_id),
                poster_url: NOT_FOUND_POSTER.to_string(),
            },
            EnrichmentState::Error => EnrichmentRecord {
                title: fallback_title(item_id),
                poster_url: error_placeholder_url(item_id),
            },
        }
    }
}

/// Title shown until, or instead of, a catalog title.
pub fn fallback_title(item_id: &ItemId) -> String {
    format!("ID: {}", item_id)
}

pub fn poster_image_url(poster_path: &str) -> String {
    format!("{}{}", POSTER_IMAGE_BASE, poster_path)
}

/// Generated image showing the title, for entries without a poster.
pub fn title_placeholder_url(title: &str) -> String {
    format!("{}?text={}", PLACEHOLDER_IMAGE_BASE, title.replace(' ', "+"))
}

/// Generated image shown when the catalog could not be reached.
pub fn error_placeholder_url(item_id: &ItemId) -> String {
    format!("{}?text=Movie+{}", PLACEHOLDER_IMAGE_BASE, item_id)
}

/// Resolves one item against the catalog.
pub async fn resolve<C: CatalogApi + ?Sized>(catalog: &C, item_id: &ItemId) -> EnrichmentState {
    let state = EnrichmentState::from_lookup(catalog.lookup(item_id).await);
    debug!("Resolved item {}: {:?}", item_id, state);
    state
}

/// Enrichment state of one displayed item.
///
/// A card owns one of these. When the card is reused for a different id the
/// resolution restarts, and a late answer for the previous id is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResolution {
    item_id: ItemId,
    state: EnrichmentState,
}

impl ItemResolution {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            state: EnrichmentState::Initial,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn state(&self) -> &EnrichmentState {
        &self.state
    }

    /// Points the resolution at `item_id`. Returns true (and resets to
    /// `Initial`) when the id changed.
    pub fn set_item(&mut self, item_id: ItemId) -> bool {
        if self.item_id == item_id {
            return false;
        }
        self.item_id = item_id;
        self.state = EnrichmentState::Initial;
        true
    }

    /// Applies a resolution result. Returns false if it was for another id.
    pub fn apply(&mut self, item_id: &ItemId, state: EnrichmentState) -> bool {
        if &self.item_id != item_id {
            debug!("Dropping enrichment for {} (now showing {})", item_id, self.item_id);
            return false;
        }
        self.state = state;
        true
    }

    pub fn record(&self) -> EnrichmentRecord {
        self.state.record(&self.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogEntry;

    fn found(title: &str, poster_path: Option<&str>) -> EnrichmentState {
        EnrichmentState::from_lookup(Ok(CatalogLookup::Found(CatalogEntry {
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
        })))
    }

    #[test]
    fn test_initial_record() {
        let record = EnrichmentState::Initial.record(&ItemId::from(7u64));
        assert_eq!(record.title, "ID: 7");
        assert!(record.poster_url.is_empty());
    }

    #[test]
    fn test_found_with_poster() {
        let record = found("The Matrix", Some("/abc.jpg")).record(&ItemId::from(603u64));
        assert_eq!(record.title, "The Matrix");
        assert_eq!(record.poster_url, "https://image.tmdb.org/t/p/w200/abc.jpg");
    }

    #[test]
    fn test_found_without_poster_uses_title_placeholder() {
        let expected = "https://via.placeholder.com/150x225.png?text=El+Padrino";
        for state in [found("El Padrino", None), found("El Padrino", Some(""))] {
            assert_eq!(state.record(&ItemId::from(238u64)).poster_url, expected);
        }
    }

    #[test]
    fn test_not_found_record() {
        let state = EnrichmentState::from_lookup(Ok(CatalogLookup::NotFound));
        let record = state.record(&ItemId::from(42u64));
        assert_eq!(record.title, "ID: 42");
        assert_eq!(record.poster_url, "notfound.png");
    }

    #[test]
    fn test_error_record() {
        let state =
            EnrichmentState::from_lookup(Err(ApiError::Transport("timed out".to_string())));
        assert_eq!(state, EnrichmentState::Error);
        let record = state.record(&ItemId::from(42u64));
        assert_eq!(record.title, "ID: 42");
        assert_eq!(
            record.poster_url,
            "https://via.placeholder.com/150x225.png?text=Movie+42"
        );
    }

    #[test]
    fn test_resolution_ignores_stale_id() {
        let mut resolution = ItemResolution::new(ItemId::from(1u64));
        assert!(resolution.set_item(ItemId::from(2u64)));
        assert!(!resolution.apply(&ItemId::from(1u64), EnrichmentState::NotFound));
        assert_eq!(resolution.state(), &EnrichmentState::Initial);

        assert!(resolution.apply(&ItemId::from(2u64), EnrichmentState::NotFound));
        assert_eq!(resolution.record().poster_url, NOT_FOUND_POSTER);
    }

    #[test]
    fn test_set_same_item_keeps_state() {
        let mut resolution = ItemResolution::new(ItemId::from(5u64));
        resolution.apply(&ItemId::from(5u64), EnrichmentState::Error);
        assert!(!resolution.set_item(ItemId::from(5u64)));
        assert!(resolution.state().is_resolved());
    }
}
