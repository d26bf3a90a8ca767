use dioxus::prelude::*;

use crate::components::use_dashboard;

/// Global app bar with title, backend status pill and metrics toggle
#[component]
pub fn AppBar(on_metrics_toggle: EventHandler<()>, metrics_collapsed: ReadSignal<bool>) -> Element {
    let state = use_dashboard().signal();
    let chevron = if metrics_collapsed() { "▼" } else { "▲" };

    // Backend pill follows the one-shot offline metrics load
    let backend_pill = {
        let state = state.read();
        if !state.offline_metrics().is_empty() {
            rsx! {
                span { class: "rs-status-pill rs-status-pill--ok",
                    span { class: "rs-status-dot rs-status-dot--ok" }
                    "Backend: connected"
                }
            }
        } else if state.error_message().is_some() && state.generation() == 0 {
            rsx! {
                span { class: "rs-status-pill rs-status-pill--error",
                    span { class: "rs-status-dot rs-status-dot--error" }
                    "Backend: unreachable"
                }
            }
        } else {
            rsx! {
                span { class: "rs-status-pill rs-status-pill--warn",
                    span { class: "rs-status-dot rs-status-dot--warn" }
                    "Backend: connecting…"
                }
            }
        }
    };

    rsx! {
        header { class: "rs-appbar",
            div { class: "rs-appbar-brand",
                h1 { class: "rs-appbar-title", "Rankscope" }
                span { class: "rs-appbar-subtitle", "SRPR vs BPR recommendation comparison" }
            }
            div { class: "rs-appbar-status",
                {backend_pill}
                button {
                    class: "rs-status-pill rs-status-pill--muted rs-status-pill--clickable",
                    onclick: move |_| on_metrics_toggle.call(()),
                    "aria-label": "Toggle request metrics",
                    "Request metrics"
                    span { class: "rs-status-chevron", "{chevron}" }
                }
            }
        }
    }
}
