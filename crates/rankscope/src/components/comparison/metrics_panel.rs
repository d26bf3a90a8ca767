use dioxus::prelude::*;
use rankscope_core::view::QueryMetricsView;

/// Recall and nDCG of the LSH list against the brute-force ground truth
#[component]
pub fn QueryMetricsPanel(view: QueryMetricsView) -> Element {
    let border_style = format!("border-left-color: {};", view.accent_color);

    rsx! {
        aside { class: "rs-query-metrics", style: "{border_style}",
            h3 { class: "rs-query-metrics-title", "{view.title}" }
            p { class: "rs-query-metrics-line", "{view.recall_line}" }
            p { class: "rs-query-metrics-line", "{view.ndcg_line}" }
        }
    }
}
