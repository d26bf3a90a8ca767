use dioxus::prelude::*;
use rankscope_core::metrics::{global_metrics, RequestSnapshot};

use crate::components::use_dashboard;
use crate::utils::format_avg_ms;

/// One row of the request table, formatted for display.
#[derive(Clone, PartialEq)]
struct RequestRow {
    name: &'static str,
    avg: String,
    recent: usize,
    total: u64,
    failures: u64,
}

impl RequestRow {
    fn new(name: &'static str, snapshot: &RequestSnapshot) -> Self {
        Self {
            name,
            avg: format_avg_ms(snapshot.avg_ms),
            recent: snapshot.count,
            total: snapshot.total,
            failures: snapshot.failures,
        }
    }
}

/// Collapsible panel with client-side request statistics
#[component]
pub fn MetricsPane(collapsed: ReadSignal<bool>) -> Element {
    let panel_class = if collapsed() {
        "rs-metrics-panel rs-metrics-panel--collapsed"
    } else {
        "rs-metrics-panel"
    };

    // Subscribe to the dashboard so the table refreshes after each request
    let state = use_dashboard().signal();
    let (generation, policy) = {
        let state = state.read();
        (state.generation(), state.policy())
    };

    let metrics = global_metrics();
    metrics.prune();
    let snapshot = metrics.snapshot();
    let window_mins = metrics.window().as_secs() / 60;

    let rows = [
        RequestRow::new("Offline metrics", &snapshot.offline_metrics),
        RequestRow::new("Queries", &snapshot.query),
        RequestRow::new("Catalog lookups", &snapshot.catalog),
    ];

    rsx! {
        section {
            class: panel_class,
            "data-role": "metrics-panel",
            header { class: "rs-metrics-header",
                h2 { class: "rs-metrics-title", "Request Metrics" }
                span { class: "rs-metrics-caption", "Rolling {window_mins} min window" }
            }

            table { class: "rs-metrics-table",
                thead {
                    tr {
                        th { "Request" }
                        th { "Avg" }
                        th { "Recent" }
                        th { "Total" }
                        th { "Failed" }
                    }
                }
                tbody {
                    for row in rows {
                        tr { key: "{row.name}",
                            td { "{row.name}" }
                            td { "{row.avg}" }
                            td { "{row.recent}" }
                            td { "{row.total}" }
                            td { class: if row.failures > 0 { "rs-metric-value--warn" } else { "" },
                                "{row.failures}"
                            }
                        }
                    }
                }
            }

            div { class: "rs-metrics-footer",
                span { "Queries issued: {generation}" }
                span { class: "rs-meta-dot", "•" }
                span { "Overlap policy: {policy}" }
            }
        }
    }
}
