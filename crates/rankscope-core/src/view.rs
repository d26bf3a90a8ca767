//! Render-ready view models for result lists, the per-query metrics panel and
//! the comparison layout.
//!
//! Everything here is a pure function of the query result; front ends only
//! decide how to draw it.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{ItemId, ModelFamily, QueryMetric, QueryMetrics, QueryResult, RecommendedItem};

/// Accent colors and captions for one comparison tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabLayout {
    pub ground_truth_label: &'static str,
    pub ground_truth_color: &'static str,
    pub lsh_label: &'static str,
    pub lsh_color: &'static str,
    pub metrics_title: &'static str,
    pub metrics_color: &'static str,
}

pub const SRPR_LAYOUT: TabLayout = TabLayout {
    ground_truth_label: "Brute Force (SRPR Ground Truth)",
    ground_truth_color: "#00695c",
    lsh_label: "LSH with SRPR",
    lsh_color: "#2e7d32",
    metrics_title: "Query Metrics (SRPR)",
    metrics_color: "#00695c",
};

pub const BPR_LAYOUT: TabLayout = TabLayout {
    ground_truth_label: "Brute Force (BPR Ground Truth)",
    ground_truth_color: "#c62828",
    lsh_label: "LSH with BPR",
    lsh_color: "#d32f2f",
    metrics_title: "Query Metrics (BPR)",
    metrics_color: "#c62828",
};

impl TabLayout {
    pub fn for_family(family: ModelFamily) -> &'static TabLayout {
        match family {
            ModelFamily::Srpr => &SRPR_LAYOUT,
            ModelFamily::Bpr => &BPR_LAYOUT,
        }
    }
}

/// Formats a list timing header. Zero or unusable timings render as empty.
pub fn format_timing(elapsed_ms: f64) -> String {
    if elapsed_ms == 0.0 || !elapsed_ms.is_finite() {
        String::new()
    } else {
        format!("{:.2} ms", elapsed_ms)
    }
}

/// One row of a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    /// Unique within the list; the item id, suffixed for repeated ids
    pub key: String,
    pub item_id: ItemId,
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultListView {
    pub label: String,
    pub timing: String,
    pub accent_color: String,
    pub entries: Vec<ListEntry>,
}

impl ResultListView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a labeled result list.
///
/// Keys are the item ids. A repeated id gets its occurrence index appended
/// (`7`, `7#1`, ...) so every key stays unique and stable for the same list.
pub fn result_list_view(
    label: &str,
    items: &[RecommendedItem],
    elapsed_ms: f64,
    accent_color: &str,
) -> ResultListView {
    let mut seen: HashMap<&ItemId, usize> = HashMap::new();
    let entries = items
        .iter()
        .map(|item| {
            let occurrence = seen.entry(&item.item_id).or_insert(0);
            let key = if *occurrence == 0 {
                item.item_id.to_string()
            } else {
                format!("{}#{}", item.item_id, occurrence)
            };
            *occurrence += 1;
            ListEntry {
                key,
                item_id: item.item_id.clone(),
                similarity: item.similarity,
            }
        })
        .collect();

    ResultListView {
        label: label.to_string(),
        timing: format_timing(elapsed_ms),
        accent_color: accent_color.to_string(),
        entries,
    }
}

/// Fixed-format summary of one model's per-query metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetricsView {
    pub title: String,
    pub accent_color: String,
    pub recall_line: String,
    pub ndcg_line: String,
}

/// Renders a metrics record, or nothing when the backend omitted it.
pub fn query_metrics_view(
    title: &str,
    metric: Option<&QueryMetric>,
    accent_color: &str,
) -> Option<QueryMetricsView> {
    let metric = metric?;
    Some(QueryMetricsView {
        title: title.to_string(),
        accent_color: accent_color.to_string(),
        recall_line: format!("Recall @K: {:.2}%", metric.recall * 100.0),
        ndcg_line: format!("nDCG @K: {:.4}", metric.ndcg),
    })
}

/// Everything one comparison tab shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub family: ModelFamily,
    pub ground_truth: ResultListView,
    pub lsh: ResultListView,
    pub metrics: Option<QueryMetricsView>,
}

impl ComparisonView {
    /// Both lists, ground truth first.
    pub fn lists(&self) -> [&ResultListView; 2] {
        [&self.ground_truth, &self.lsh]
    }
}

/// Builds the comparison view for one family from a query result.
pub fn comparison_view(
    result: &QueryResult,
    metrics: Option<&QueryMetrics>,
    family: ModelFamily,
) -> ComparisonView {
    let layout = TabLayout::for_family(family);
    ComparisonView {
        family,
        ground_truth: result_list_view(
            layout.ground_truth_label,
            result.ground_truth(family),
            result.ground_truth_ms(family),
            layout.ground_truth_color,
        ),
        lsh: result_list_view(
            layout.lsh_label,
            result.lsh(family),
            result.lsh_ms(family),
            layout.lsh_color,
        ),
        metrics: query_metrics_view(
            layout.metrics_title,
            metrics.and_then(|m| m.for_family(family)),
            layout.metrics_color,
        ),
    }
}
