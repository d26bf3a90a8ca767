//! Data model shared by the backend client, the dashboard and the views.
//!
//! Shapes follow the JSON contract of the recommender backend:
//!
//! - `GET /api/metrics` returns `Vec<OfflineMetricRecord>`
//! - `GET /api/recommend` returns a [`QueryResult`] or `{ "error": "..." }`
//!
//! Optional extras the backend emits (precision, MAP, per-family query
//! metrics) may be absent; the four result lists and the timings may not.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::config::DEFAULT_K;

/// The two ranking model families being compared.
///
/// Doubles as the comparison tab selector: the active family decides which
/// half of a [`QueryResult`] is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// Robust model (SRPR)
    #[default]
    Srpr,
    /// Baseline model (BPR)
    Bpr,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 2] = [ModelFamily::Srpr, ModelFamily::Bpr];

    /// Short label used in tabs and headers.
    pub fn label(&self) -> &'static str {
        match self {
            ModelFamily::Srpr => "SRPR",
            ModelFamily::Bpr => "BPR",
        }
    }

    /// Tab caption.
    pub fn tab_title(&self) -> &'static str {
        match self {
            ModelFamily::Srpr => "SRPR Model (Robust)",
            ModelFamily::Bpr => "BPR Model (Baseline)",
        }
    }

    /// Classifies a backend model label. Anything that is not SRPR is treated as BPR.
    pub fn from_model_label(label: &str) -> Self {
        if label.contains("SRPR") {
            ModelFamily::Srpr
        } else {
            ModelFamily::Bpr
        }
    }
}

impl std::str::FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srpr" => Ok(ModelFamily::Srpr),
            "bpr" => Ok(ModelFamily::Bpr),
            other => Err(format!("unknown model family: {}", other)),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Precomputed offline quality metrics for one evaluated model variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineMetricRecord {
    /// Backend label, e.g. "LSH + SRPR (Robusto)"
    pub model: String,
    pub n_recall: f64,
    pub recall: f64,
    pub ndcg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<f64>,
}

impl OfflineMetricRecord {
    pub fn family(&self) -> ModelFamily {
        ModelFamily::from_model_label(&self.model)
    }
}

/// Item identifier as decimal text.
///
/// The backend emits integers while other producers may emit strings; both
/// decode to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(n) => ItemId(n.to_string()),
            RawId::Signed(n) => ItemId(n.to_string()),
            RawId::Text(s) => ItemId(s),
        })
    }
}

/// One entry of a recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub item_id: ItemId,
    /// Cosine similarity reported by the backend, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl RecommendedItem {
    pub fn new(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: item_id.into(),
            similarity: None,
        }
    }
}

/// Wall-clock time the backend spent producing each list, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTimings {
    pub srpr_brute_force_ms: f64,
    pub srpr_lsh_ms: f64,
    pub bpr_brute_force_ms: f64,
    pub bpr_lsh_ms: f64,
}

/// Quality of one model's LSH list against its ground truth, for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryMetric {
    /// Recall@K in `[0, 1]`
    pub recall: f64,
    /// nDCG@K, non-negative
    pub ndcg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_recall: Option<f64>,
}

impl QueryMetric {
    pub fn new(recall: f64, ndcg: f64) -> Self {
        Self {
            recall,
            ndcg,
            precision: None,
            map: None,
            n_recall: None,
        }
    }
}

/// Per-query metrics for both families. Either entry may be omitted by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    #[serde(default)]
    pub srpr: Option<QueryMetric>,
    #[serde(default)]
    pub bpr: Option<QueryMetric>,
}

impl QueryMetrics {
    pub fn for_family(&self, family: ModelFamily) -> Option<&QueryMetric> {
        match family {
            ModelFamily::Srpr => self.srpr.as_ref(),
            ModelFamily::Bpr => self.bpr.as_ref(),
        }
    }
}

/// Full response of a successful recommendation query.
///
/// Replaced as a whole on every query; never merged with a previous result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub srpr_ground_truth: Vec<RecommendedItem>,
    pub srpr_lsh: Vec<RecommendedItem>,
    pub bpr_ground_truth: Vec<RecommendedItem>,
    pub bpr_lsh: Vec<RecommendedItem>,
    pub timings: QueryTimings,
    #[serde(default)]
    pub query_metrics: QueryMetrics,
}

impl QueryResult {
    /// Brute-force ground truth list for a family.
    pub fn ground_truth(&self, family: ModelFamily) -> &[RecommendedItem] {
        match family {
            ModelFamily::Srpr => &self.srpr_ground_truth,
            ModelFamily::Bpr => &self.bpr_ground_truth,
        }
    }

    /// LSH approximate list for a family.
    pub fn lsh(&self, family: ModelFamily) -> &[RecommendedItem] {
        match family {
            ModelFamily::Srpr => &self.srpr_lsh,
            ModelFamily::Bpr => &self.bpr_lsh,
        }
    }

    pub fn ground_truth_ms(&self, family: ModelFamily) -> f64 {
        match family {
            ModelFamily::Srpr => self.timings.srpr_brute_force_ms,
            ModelFamily::Bpr => self.timings.bpr_brute_force_ms,
        }
    }

    pub fn lsh_ms(&self, family: ModelFamily) -> f64 {
        match family {
            ModelFamily::Srpr => self.timings.srpr_lsh_ms,
            ModelFamily::Bpr => self.timings.bpr_lsh_ms,
        }
    }
}

/// What the query endpoint can answer with.
///
/// Any object carrying a non-null `error` field is a backend-reported failure
/// regardless of other fields; a non-string `error` keeps its JSON text.
/// Everything else must be a complete [`QueryResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Error { error: String },
    Result(QueryResult),
}

impl<'de> Deserialize<'de> for QueryResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let error = match error {
                serde_json::Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            return Ok(QueryResponse::Error { error });
        }

        QueryResult::deserialize(value)
            .map(QueryResponse::Result)
            .map_err(serde::de::Error::custom)
    }
}

/// Parameters of one recommendation query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub user_id: String,
    pub k: usize,
}

impl QueryRequest {
    pub fn new(user_id: impl Into<String>, k: usize) -> Self {
        Self {
            user_id: user_id.into(),
            k,
        }
    }

    /// Builds a request from raw form input.
    ///
    /// Returns `None` when the user id is empty after trimming. A `k` that is
    /// not a positive integer falls back to `default_k`.
    pub fn from_form(user_id: &str, k: &str, default_k: usize) -> Option<Self> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return None;
        }
        Some(Self::new(user_id, parse_k(k, default_k)))
    }
}

/// Parses a top-K value, falling back to `default_k` (or [`DEFAULT_K`] if
/// that is zero too) for anything that is not a positive integer.
pub fn parse_k(raw: &str, default_k: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(k) if k > 0 => k,
        _ if default_k > 0 => default_k,
        _ => DEFAULT_K,
    }
}

/// Display metadata for one item, as shown on a movie card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub title: String,
    pub poster_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "srpr_ground_truth": [{"item_id": 7}],
        "srpr_lsh": [],
        "bpr_ground_truth": [],
        "bpr_lsh": [],
        "timings": {"srpr_brute_force_ms": 12.5, "srpr_lsh_ms": 1.2, "bpr_brute_force_ms": 10.0, "bpr_lsh_ms": 0.9},
        "query_metrics": {"srpr": {"recall": 0.8, "ndcg": 0.75}, "bpr": {"recall": 0.6, "ndcg": 0.5}}
    }"#;

    #[test]
    fn test_decode_query_result() {
        let response: QueryResponse = serde_json::from_str(SAMPLE).unwrap();
        let QueryResponse::Result(result) = response else {
            panic!("expected a result payload");
        };
        assert_eq!(result.srpr_ground_truth, vec![RecommendedItem::new(7u64)]);
        assert_eq!(result.ground_truth_ms(ModelFamily::Srpr), 12.5);
        assert_eq!(result.lsh_ms(ModelFamily::Bpr), 0.9);
        assert_eq!(
            result.query_metrics.for_family(ModelFamily::Srpr),
            Some(&QueryMetric::new(0.8, 0.75))
        );
    }

    #[test]
    fn test_decode_backend_error() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"error": "user not found"}"#).unwrap();
        assert_eq!(
            response,
            QueryResponse::Error {
                error: "user not found".to_string()
            }
        );
    }

    #[test]
    fn test_non_string_error_is_backend_error() {
        let response: QueryResponse = serde_json::from_str(r#"{"error": 42}"#).unwrap();
        assert_eq!(
            response,
            QueryResponse::Error {
                error: "42".to_string()
            }
        );

        let response: QueryResponse =
            serde_json::from_str(r#"{"error": {"code": 404}, "srpr_lsh": []}"#).unwrap();
        assert_eq!(
            response,
            QueryResponse::Error {
                error: r#"{"code":404}"#.to_string()
            }
        );
    }

    #[test]
    fn test_null_error_is_not_backend_error() {
        let body = SAMPLE.replacen('{', r#"{"error": null,"#, 1);
        let response: QueryResponse = serde_json::from_str(&body).unwrap();
        assert!(matches!(response, QueryResponse::Result(_)));
    }

    #[test]
    fn test_unrelated_object_is_rejected() {
        assert!(serde_json::from_str::<QueryResponse>("{}").is_err());
        assert!(serde_json::from_str::<QueryResponse>(r#"{"status": "ok"}"#).is_err());
        assert!(serde_json::from_str::<QueryResponse>(r#"{"srpr_lsh": []}"#).is_err());
    }

    #[test]
    fn test_item_id_accepts_numbers_and_strings() {
        let items: Vec<RecommendedItem> = serde_json::from_str(
            r#"[{"item_id": 42, "similarity": 0.91}, {"item_id": "603"}, {"item_id": -1}]"#,
        )
        .unwrap();
        assert_eq!(items[0].item_id.as_str(), "42");
        assert_eq!(items[0].similarity, Some(0.91));
        assert_eq!(items[1].item_id.as_str(), "603");
        assert_eq!(items[2].item_id.as_str(), "-1");
    }

    #[test]
    fn test_missing_query_metric_is_none() {
        let result: QueryResult = serde_json::from_str(
            r#"{
                "srpr_ground_truth": [], "srpr_lsh": [], "bpr_ground_truth": [], "bpr_lsh": [],
                "timings": {"srpr_brute_force_ms": 1.0, "srpr_lsh_ms": 1.0,
                            "bpr_brute_force_ms": 1.0, "bpr_lsh_ms": 1.0},
                "query_metrics": {"srpr": {"recall": 1.0, "ndcg": 1.0}}
            }"#,
        )
        .unwrap();
        assert!(result.query_metrics.for_family(ModelFamily::Bpr).is_none());
        assert!(result.bpr_lsh.is_empty());
    }

    #[test]
    fn test_offline_record_family() {
        let records: Vec<OfflineMetricRecord> = serde_json::from_str(
            r#"[
                {"model": "LSH + BPR (No Robusto)", "precision": 0.1, "recall": 0.2, "map": 0.3, "ndcg": 0.4, "n_recall": 0.5},
                {"model": "LSH + SRPR (Robusto)", "recall": 0.6, "ndcg": 0.7, "n_recall": 0.8}
            ]"#,
        )
        .unwrap();
        assert_eq!(records[0].family(), ModelFamily::Bpr);
        assert_eq!(records[0].precision, Some(0.1));
        assert_eq!(records[1].family(), ModelFamily::Srpr);
        assert_eq!(records[1].map, None);
    }

    #[test]
    fn test_query_request_from_form() {
        assert_eq!(QueryRequest::from_form("", "10", DEFAULT_K), None);
        assert_eq!(QueryRequest::from_form("   ", "10", DEFAULT_K), None);
        assert_eq!(
            QueryRequest::from_form(" 15 ", "5", DEFAULT_K),
            Some(QueryRequest::new("15", 5))
        );
        assert_eq!(
            QueryRequest::from_form("15", "lots", 25),
            Some(QueryRequest::new("15", 25))
        );
    }

    #[test]
    fn test_parse_k_falls_back_to_default() {
        assert_eq!(parse_k("20", DEFAULT_K), 20);
        assert_eq!(parse_k("0", DEFAULT_K), DEFAULT_K);
        assert_eq!(parse_k("-3", DEFAULT_K), DEFAULT_K);
        assert_eq!(parse_k("abc", DEFAULT_K), DEFAULT_K);
        assert_eq!(parse_k("", DEFAULT_K), DEFAULT_K);
    }

    #[test]
    fn test_parse_k_uses_configured_default() {
        assert_eq!(parse_k("abc", 25), 25);
        assert_eq!(parse_k("0", 25), 25);
        assert_eq!(parse_k("7", 25), 7);
        assert_eq!(parse_k("abc", 0), DEFAULT_K);
    }

    #[test]
    fn test_model_family_parse() {
        assert_eq!("SRPR".parse::<ModelFamily>(), Ok(ModelFamily::Srpr));
        assert_eq!(" bpr ".parse::<ModelFamily>(), Ok(ModelFamily::Bpr));
        assert!("both".parse::<ModelFamily>().is_err());
    }
}
