//! Output formatting for both subcommands.
//!
//! Human-readable tables for the terminal and pretty JSON for scripting.

use rankscope_core::chart::{offline_chart, ChartData};
use rankscope_core::types::OfflineMetricRecord;
use rankscope_core::view::{ComparisonView, ResultListView};
use serde::Serialize;

use crate::commands::QueryReport;

/// Maximum characters of a movie title in the human output.
const TITLE_MAX_LEN: usize = 48;

#[derive(Serialize)]
struct MetricsJson<'a> {
    records: &'a [OfflineMetricRecord],
    chart: ChartData,
}

/// Formats offline metrics as JSON: the raw records plus the chart datasets.
pub fn format_metrics_json(records: &[OfflineMetricRecord]) -> String {
    let output = MetricsJson {
        records,
        chart: offline_chart(records),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats offline metrics as a table, one row per model.
pub fn format_metrics_human(records: &[OfflineMetricRecord]) -> String {
    let chart = offline_chart(records);
    if chart.datasets.is_empty() {
        return "No offline metrics available".to_string();
    }

    let model_width = chart
        .datasets
        .iter()
        .map(|d| d.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    let mut output = format!("{:<width$}", "Model", width = model_width);
    for label in &chart.labels {
        output.push_str(&format!("  {:>10}", label));
    }
    output.push('\n');

    for dataset in &chart.datasets {
        output.push_str(&format!("{:<width$}", dataset.label, width = model_width));
        for value in dataset.data {
            output.push_str(&format!("  {:>10.4}", value));
        }
        output.push_str(&format!("  [{}]\n", dataset.family));
    }

    output.trim_end().to_string()
}

/// Formats a query report as JSON.
pub fn format_query_json(report: &QueryReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a query report for the terminal.
pub fn format_query_human(report: &QueryReport) -> String {
    let mut output = format!(
        "Recommendations for user {} (k={})\n",
        report.request.user_id, report.request.k
    );

    for comparison in &report.comparisons {
        output.push('\n');
        output.push_str(&format_comparison(comparison, report));
    }

    output.trim_end().to_string()
}

fn format_comparison(comparison: &ComparisonView, report: &QueryReport) -> String {
    let mut output = format!("== {} ==\n", comparison.family.tab_title());

    for list in comparison.lists() {
        output.push_str(&format_list(list, report));
    }

    match &comparison.metrics {
        Some(metrics) => {
            output.push_str(&format!("{}\n", metrics.title));
            output.push_str(&format!("   {}\n", metrics.recall_line));
            output.push_str(&format!("   {}\n", metrics.ndcg_line));
        }
        None => output.push_str("No query metrics\n"),
    }

    output
}

fn format_list(list: &ResultListView, report: &QueryReport) -> String {
    let mut output = if list.timing.is_empty() {
        format!("{}\n", list.label)
    } else {
        format!("{} ({})\n", list.label, list.timing)
    };

    if list.is_empty() {
        output.push_str("   (no items)\n");
    }

    for (i, entry) in list.entries.iter().enumerate() {
        output.push_str(&format!("{:>3}. {:>8}", i + 1, entry.item_id.to_string()));
        if let Some(record) = report.enrichment.get(entry.item_id.as_str()) {
            output.push_str(&format!("  {}", truncate_text(&record.title, TITLE_MAX_LEN)));
        }
        if let Some(similarity) = entry.similarity {
            output.push_str(&format!("  (sim {:.3})", similarity));
        }
        output.push('\n');
    }

    output
}

/// Truncates text to a maximum number of characters, adding ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankscope_core::types::{
        EnrichmentRecord, ModelFamily, QueryMetric, QueryMetrics, QueryRequest, QueryResult,
        QueryTimings, RecommendedItem,
    };
    use rankscope_core::view::comparison_view;
    use std::collections::BTreeMap;

    fn record(model: &str, n_recall: f64) -> OfflineMetricRecord {
        OfflineMetricRecord {
            model: model.to_string(),
            n_recall,
            recall: 0.25,
            ndcg: 0.5,
            precision: None,
            map: None,
        }
    }

    fn report() -> QueryReport {
        let result = QueryResult {
            srpr_ground_truth: vec![RecommendedItem {
                item_id: 7u64.into(),
                similarity: Some(0.91234),
            }],
            srpr_lsh: vec![],
            bpr_ground_truth: vec![],
            bpr_lsh: vec![],
            timings: QueryTimings {
                srpr_brute_force_ms: 12.5,
                ..Default::default()
            },
            query_metrics: QueryMetrics {
                srpr: Some(QueryMetric::new(0.8, 0.75)),
                bpr: None,
            },
        };
        let mut enrichment = BTreeMap::new();
        enrichment.insert(
            "7".to_string(),
            EnrichmentRecord {
                title: "The Matrix".to_string(),
                poster_url: String::new(),
            },
        );
        QueryReport {
            request: QueryRequest::new("1", 10),
            comparisons: vec![comparison_view(
                &result,
                Some(&result.query_metrics),
                ModelFamily::Srpr,
            )],
            enrichment,
        }
    }

    #[test]
    fn test_format_metrics_human_empty() {
        assert!(format_metrics_human(&[]).contains("No offline metrics"));
    }

    #[test]
    fn test_format_metrics_human() {
        let records = [record("LSH + SRPR (Robusto)", 0.4123), record("BPR", 0.3)];
        let output = format_metrics_human(&records);
        assert!(output.contains("nRecall@10"));
        assert!(output.contains("LSH + SRPR (Robusto)"));
        assert!(output.contains("0.4123"));
        assert!(output.contains("[SRPR]"));
        assert!(output.contains("[BPR]"));
    }

    #[test]
    fn test_format_metrics_json() {
        let output = format_metrics_json(&[record("SRPR", 0.4)]);
        assert!(output.contains("\"records\""));
        assert!(output.contains("\"backgroundColor\": \"rgba(54, 162, 235, 0.6)\""));
    }

    #[test]
    fn test_format_query_human() {
        let output = format_query_human(&report());
        assert!(output.contains("Recommendations for user 1 (k=10)"));
        assert!(output.contains("Brute Force (SRPR Ground Truth) (12.50 ms)"));
        assert!(output.contains("The Matrix"));
        assert!(output.contains("(sim 0.912)"));
        assert!(output.contains("(no items)"));
        assert!(output.contains("Recall @K: 80.00%"));
    }

    #[test]
    fn test_format_query_json() {
        let output = format_query_json(&report());
        assert!(output.contains("\"user_id\": \"1\""));
        assert!(output.contains("\"title\": \"The Matrix\""));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 10), "Short");
        assert_eq!(truncate_text("Una película larga", 8), "Una pelí...");
    }
}
