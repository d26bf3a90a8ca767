use dioxus::prelude::*;
use rankscope_core::view::ResultListView;

use super::MovieCard;

/// One labeled list of recommended movies with its timing
#[component]
pub fn ResultList(view: ResultListView) -> Element {
    let header_style = format!("color: {};", view.accent_color);

    rsx! {
        div { class: "rs-result-list",
            header { class: "rs-result-list-header",
                h3 { class: "rs-result-list-title", style: "{header_style}", "{view.label}" }
                if !view.timing.is_empty() {
                    span { class: "rs-result-list-timing", "{view.timing}" }
                }
            }
            if view.is_empty() {
                p { class: "rs-result-list-empty", "No items." }
            } else {
                div { class: "rs-movie-grid",
                    for entry in view.entries.iter() {
                        MovieCard {
                            key: "{entry.key}",
                            item_id: entry.item_id.clone(),
                            similarity: entry.similarity,
                        }
                    }
                }
            }
        }
    }
}
