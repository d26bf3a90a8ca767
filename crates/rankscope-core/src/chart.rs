//! Bar chart data for the offline metrics.
//!
//! One dataset per offline record, in input order, each with exactly three
//! points: nRecall, Recall and nDCG at the offline K.

use serde::Serialize;

use crate::config::OFFLINE_METRICS_K;
use crate::types::{ModelFamily, OfflineMetricRecord};

const SRPR_BACKGROUND: &str = "rgba(54, 162, 235, 0.6)";
const SRPR_BORDER: &str = "rgba(54, 162, 235, 1)";
const BPR_BACKGROUND: &str = "rgba(255, 99, 132, 0.6)";
const BPR_BORDER: &str = "rgba(255, 99, 132, 1)";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub family: ModelFamily,
    /// `[n_recall, recall, ndcg]`
    pub data: [f64; 3],
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: [String; 3],
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Largest value across all datasets; 0 when empty.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

pub fn chart_labels() -> [String; 3] {
    [
        format!("nRecall@{}", OFFLINE_METRICS_K),
        format!("Recall@{}", OFFLINE_METRICS_K),
        format!("nDCG@{}", OFFLINE_METRICS_K),
    ]
}

pub fn offline_chart(records: &[OfflineMetricRecord]) -> ChartData {
    let datasets = records
        .iter()
        .map(|record| {
            let family = record.family();
            let (background_color, border_color) = match family {
                ModelFamily::Srpr => (SRPR_BACKGROUND, SRPR_BORDER),
                ModelFamily::Bpr => (BPR_BACKGROUND, BPR_BORDER),
            };
            ChartDataset {
                label: record.model.clone(),
                family,
                data: [record.n_recall, record.recall, record.ndcg],
                background_color,
                border_color,
                border_width: 1,
            }
        })
        .collect();

    ChartData {
        labels: chart_labels(),
        datasets,
    }
}
