//! Formatting helpers for values the core does not format itself.

/// Rolling average latency, or a dash when there are no samples yet.
pub fn format_avg_ms(avg_ms: Option<f64>) -> String {
    match avg_ms {
        Some(ms) if ms >= 100.0 => format!("{:.0} ms", ms),
        Some(ms) => format!("{:.1} ms", ms),
        None => "-".to_string(),
    }
}

/// Similarity score shown under a movie card.
pub fn format_similarity(similarity: Option<f64>) -> Option<String> {
    similarity.map(|s| format!("sim {:.3}", s))
}

/// Height of a chart bar as a percentage of the tallest bar, clamped to `[0, 100]`.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Chart value label, e.g. `0.412`.
pub fn format_metric_value(value: f64) -> String {
    format!("{:.3}", value)
}
