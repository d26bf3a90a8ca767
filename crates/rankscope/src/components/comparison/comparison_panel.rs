use dioxus::prelude::*;
use rankscope_core::messages::QUERY_LOADING;
use rankscope_core::types::ModelFamily;

use super::{QueryMetricsPanel, ResultList};
use crate::components::{use_controller, use_dashboard};

/// Tabbed SRPR / BPR comparison of the latest query result.
///
/// The tabs only appear once a result is present.
#[component]
pub fn ComparisonPanel() -> Element {
    let state = use_dashboard().signal();
    let (active_tab, error, loading, comparison) = {
        let state = state.read();
        (
            state.active_tab(),
            state.error_message().map(str::to_string),
            state.is_loading(),
            state.active_comparison(),
        )
    };
    let has_result = comparison.is_some();

    rsx! {
        section { class: "rs-card rs-comparison",
            if has_result {
                nav { class: "rs-tabs",
                    for family in ModelFamily::ALL {
                        TabButton { key: "{family.label()}", family, active: family == active_tab }
                    }
                }
            }

            if let Some(message) = error {
                div { class: "rs-error-banner", role: "alert", "{message}" }
            }

            if loading {
                div { class: "rs-loading",
                    span { class: "rs-spinner" }
                    "{QUERY_LOADING}"
                }
            }

            if let Some(comparison) = comparison {
                div { class: "rs-comparison-body",
                    div { class: "rs-result-columns",
                        ResultList { view: comparison.ground_truth.clone() }
                        ResultList { view: comparison.lsh.clone() }
                    }
                    if let Some(metrics) = comparison.metrics.clone() {
                        QueryMetricsPanel { view: metrics }
                    }
                }
            }
        }
    }
}

#[component]
fn TabButton(family: ModelFamily, active: bool) -> Element {
    let controller = use_controller();
    let family_class = match family {
        ModelFamily::Srpr => "rs-tab--srpr",
        ModelFamily::Bpr => "rs-tab--bpr",
    };
    let class = if active {
        format!("rs-tab {} rs-tab--active", family_class)
    } else {
        format!("rs-tab {}", family_class)
    };

    rsx! {
        button {
            class: "{class}",
            "aria-selected": "{active}",
            onclick: move |_| controller.select_tab(family),
            "{family.tab_title()}"
        }
    }
}
