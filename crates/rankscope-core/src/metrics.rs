//! Client-side request metrics with rolling averages.
//!
//! Every call to the backend or the catalog records its latency and whether
//! it succeeded. The UI footer and the CLI's verbose output read snapshots.
//!
//! ## Architecture
//!
//! A global singleton (`global_metrics()`) is shared by all clients, since the
//! clients are created independently in several places (controller, movie
//! cards, CLI) and all need to record to the same collector.

use instant::Instant;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default window size for rolling averages (5 minutes).
/// Queries are operator-driven and infrequent, so the window is long.
const DEFAULT_WINDOW_SECS: u64 = 300;

/// Maximum samples to keep per metric (prevents unbounded growth).
const MAX_SAMPLES: usize = 1000;

/// The network calls the dashboard makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    OfflineMetrics,
    Query,
    CatalogLookup,
}

/// A single timing sample with timestamp.
#[derive(Clone, Debug)]
struct TimingSample {
    timestamp: Instant,
    duration_ms: f64,
}

/// Rolling statistics for one request kind.
#[derive(Debug, Default)]
struct MetricData {
    /// Recent samples within the rolling window.
    samples: VecDeque<TimingSample>,
    /// Total count since startup.
    total_count: u64,
    /// Failures since startup.
    failure_count: u64,
}

impl MetricData {
    fn record(&mut self, duration_ms: f64, ok: bool) {
        self.total_count += 1;
        if !ok {
            self.failure_count += 1;
        }

        self.samples.push_back(TimingSample {
            timestamp: Instant::now(),
            duration_ms,
        });
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    fn prune(&mut self, window: Duration) {
        // checked_sub: on WASM Instant starts at page load
        let Some(cutoff) = Instant::now().checked_sub(window) else {
            return;
        };

        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn in_window(&self, window: Duration) -> impl Iterator<Item = &TimingSample> {
        let cutoff = Instant::now().checked_sub(window);
        self.samples
            .iter()
            .filter(move |s| cutoff.is_none_or(|c| s.timestamp >= c))
    }

    fn rolling_avg(&self, window: Duration) -> Option<f64> {
        let (sum, count) = self
            .in_window(window)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.duration_ms, count + 1));
        if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        }
    }

    fn rolling_count(&self, window: Duration) -> usize {
        self.in_window(window).count()
    }

    fn snapshot(&self, window: Duration) -> RequestSnapshot {
        RequestSnapshot {
            avg_ms: self.rolling_avg(window),
            count: self.rolling_count(window),
            total: self.total_count,
            failures: self.failure_count,
        }
    }
}

/// Statistics for one request kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestSnapshot {
    /// Average latency within the window (ms)
    pub avg_ms: Option<f64>,
    /// Requests within the window
    pub count: usize,
    /// Requests since startup
    pub total: u64,
    /// Failed requests since startup
    pub failures: u64,
}

/// Collected metrics snapshot for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub offline_metrics: RequestSnapshot,
    pub query: RequestSnapshot,
    pub catalog: RequestSnapshot,
}

#[derive(Default)]
struct MetricsInner {
    offline_metrics: MetricData,
    query: MetricData,
    catalog: MetricData,
}

impl MetricsInner {
    fn data_mut(&mut self, kind: RequestKind) -> &mut MetricData {
        match kind {
            RequestKind::OfflineMetrics => &mut self.offline_metrics,
            RequestKind::Query => &mut self.query,
            RequestKind::CatalogLookup => &mut self.catalog,
        }
    }
}

/// Thread-safe request metrics collector.
#[derive(Clone)]
pub struct RequestMetrics {
    inner: Arc<RwLock<MetricsInner>>,
    window: Duration,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_SECS)
    }

    /// Collector with a custom window (for testing).
    pub fn with_window(window_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner::default())),
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records one finished request.
    pub fn record(&self, kind: RequestKind, duration_ms: f64, ok: bool) {
        if let Ok(mut inner) = self.inner.write() {
            inner.data_mut(kind).record(duration_ms, ok);
        }
    }

    /// Drops samples older than the window.
    pub fn prune(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.offline_metrics.prune(self.window);
            inner.query.prune(self.window);
            inner.catalog.prune(self.window);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(_) => return MetricsSnapshot::default(),
        };

        MetricsSnapshot {
            offline_metrics: inner.offline_metrics.snapshot(self.window),
            query: inner.query.snapshot(self.window),
            catalog: inner.catalog.snapshot(self.window),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MetricsInner::default();
        }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_METRICS: Lazy<RequestMetrics> = Lazy::new(RequestMetrics::new);

/// Get the global metrics collector.
pub fn global_metrics() -> &'static RequestMetrics {
    &GLOBAL_METRICS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_and_snapshot() {
        let metrics = RequestMetrics::with_window(60);

        metrics.record(RequestKind::CatalogLookup, 100.0, true);
        metrics.record(RequestKind::CatalogLookup, 200.0, false);
        metrics.record(RequestKind::CatalogLookup, 150.0, true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.catalog.count, 3);
        assert_eq!(snapshot.catalog.failures, 1);
        assert!((snapshot.catalog.avg_ms.unwrap() - 150.0).abs() < 0.1);
        assert_eq!(snapshot.query, RequestSnapshot::default());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RequestMetrics::new().snapshot();
        assert_eq!(snapshot.query.count, 0);
        assert!(snapshot.query.avg_ms.is_none());
    }

    #[test]
    fn test_prune_old_samples() {
        let metrics = RequestMetrics::with_window(1);
        metrics.record(RequestKind::Query, 50.0, true);

        thread::sleep(Duration::from_millis(1100));

        metrics.prune();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.query.count, 0);
        // Lifetime total survives pruning
        assert_eq!(snapshot.query.total, 1);
    }

    #[test]
    fn test_clear_metrics() {
        let metrics = RequestMetrics::new();
        metrics.record(RequestKind::OfflineMetrics, 10.0, false);
        metrics.clear();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
