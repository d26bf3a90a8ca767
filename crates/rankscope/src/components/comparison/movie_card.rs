use dioxus::prelude::*;
use rankscope_core::enrichment::{resolve, ItemResolution};
use rankscope_core::types::ItemId;

use crate::components::use_services;
use crate::utils::{format_similarity, SignalExt};

/// Poster and title of one recommended item.
///
/// The card resolves its item against the catalog on mount and whenever it
/// is given a different id. It shows `ID: <id>` until the lookup settles,
/// and a placeholder if the catalog cannot help.
#[component]
pub fn MovieCard(
    item_id: ReadSignal<ItemId>,
    #[props(!optional)] similarity: Option<f64>,
) -> Element {
    let services = use_services();
    let mut resolution = use_signal(|| ItemResolution::new(item_id()));

    use_effect(move || {
        let id = item_id();
        // Written, not read: the effect only tracks `item_id`
        resolution.mutate(|r| r.set_item(id.clone()));

        let catalog = services.catalog.clone();
        spawn(async move {
            let state = resolve(&*catalog, &id).await;
            resolution.mutate(|r| r.apply(&id, state));
        });
    });

    let record = resolution.read().record();
    let similarity = format_similarity(similarity);

    rsx! {
        article { class: "rs-movie-card",
            if record.poster_url.is_empty() {
                div { class: "rs-movie-poster rs-movie-poster--pending" }
            } else {
                img {
                    class: "rs-movie-poster",
                    src: "{record.poster_url}",
                    alt: "{record.title}",
                    loading: "lazy",
                }
            }
            p { class: "rs-movie-title", title: "{record.title}", "{record.title}" }
            if let Some(similarity) = similarity {
                span { class: "rs-movie-similarity", "{similarity}" }
            }
        }
    }
}
