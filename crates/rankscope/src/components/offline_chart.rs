use dioxus::prelude::*;
use rankscope_core::chart::{offline_chart, ChartData};
use rankscope_core::messages::OFFLINE_METRICS_LOADING;

use crate::components::use_dashboard;
use crate::utils::{bar_percent, format_metric_value};

/// One bar, ready to render.
#[derive(Clone, PartialEq)]
struct BarView {
    key: String,
    model: String,
    value: String,
    style: String,
}

/// One metric group (nRecall, Recall, nDCG) with a bar per model.
#[derive(Clone, PartialEq)]
struct GroupView {
    label: String,
    bars: Vec<BarView>,
}

fn chart_groups(chart: &ChartData) -> Vec<GroupView> {
    let max = chart.max_value();
    chart
        .labels
        .iter()
        .enumerate()
        .map(|(point, label)| GroupView {
            label: label.clone(),
            bars: chart
                .datasets
                .iter()
                .enumerate()
                .map(|(i, dataset)| {
                    let value = dataset.data[point];
                    BarView {
                        key: format!("{}-{}", i, dataset.label),
                        model: dataset.label.clone(),
                        value: format_metric_value(value),
                        style: format!(
                            "height: {:.1}%; background-color: {}; border: {}px solid {};",
                            bar_percent(value, max),
                            dataset.background_color,
                            dataset.border_width,
                            dataset.border_color,
                        ),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Offline model comparison as a grouped bar chart
#[component]
pub fn OfflineMetricsChart() -> Element {
    let state = use_dashboard().signal();
    let chart = offline_chart(state.read().offline_metrics());

    if chart.datasets.is_empty() {
        return rsx! {
            section { class: "rs-card rs-chart-card",
                h2 { class: "rs-card-title", "Offline Model Comparison" }
                p { class: "rs-chart-loading", "{OFFLINE_METRICS_LOADING}" }
            }
        };
    }

    let groups = chart_groups(&chart);
    let legend: Vec<(String, String)> = chart
        .datasets
        .iter()
        .map(|d| {
            let swatch = format!(
                "background-color: {}; border-color: {};",
                d.background_color, d.border_color
            );
            (d.label.clone(), swatch)
        })
        .collect();

    rsx! {
        section { class: "rs-card rs-chart-card",
            h2 { class: "rs-card-title", "Offline Model Comparison" }

            div { class: "rs-chart-legend",
                for (i, (label, swatch)) in legend.into_iter().enumerate() {
                    span { key: "{i}", class: "rs-chart-legend-item",
                        span { class: "rs-chart-swatch", style: "{swatch}" }
                        "{label}"
                    }
                }
            }

            div { class: "rs-chart",
                for group in groups {
                    div { key: "{group.label}", class: "rs-chart-group",
                        div { class: "rs-chart-bars",
                            for bar in group.bars {
                                div {
                                    key: "{bar.key}",
                                    class: "rs-chart-bar",
                                    style: "{bar.style}",
                                    title: "{bar.model}: {bar.value}",
                                    span { class: "rs-chart-bar-value", "{bar.value}" }
                                }
                            }
                        }
                        span { class: "rs-chart-group-label", "{group.label}" }
                    }
                }
            }
        }
    }
}
