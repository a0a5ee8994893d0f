//! Upload metrics.
//!
//! Counters and histograms go through the `metrics` facade (exported as
//! Prometheus text at `/metrics` when a recorder is installed); a local copy
//! of the same numbers backs the JSON `/api/metrics` snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use flood_processor::ErrorKind;
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

/// Metrics collector for the flood API.
#[derive(Debug)]
pub struct MetricsCollector {
    pub uploads: AtomicU64,
    pub processing_errors: AtomicU64,
    processing_times: RwLock<TimingStats>,
    start_time: Instant,
}

/// Point-in-time view of the collected metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub uploads: u64,
    pub processing_errors: u64,
    pub processed: u64,
    pub avg_processing_ms: f64,
    pub min_processing_ms: f64,
    pub max_processing_ms: f64,
    pub last_processing_ms: f64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            uploads: AtomicU64::new(0),
            processing_errors: AtomicU64::new(0),
            processing_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record an accepted upload.
    pub fn record_upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        counter!("flood_uploads_total").increment(1);
    }

    /// Record a pipeline run that produced an overlay.
    pub async fn record_processing(&self, duration_us: u64, area_km2: f64) {
        histogram!("flood_processing_duration_ms").record(duration_us as f64 / 1000.0);
        gauge!("flood_last_area_km2").set(area_km2);

        let mut times = self.processing_times.write().await;
        times.record(duration_us);
    }

    /// Record a failed upload, labelled by error kind.
    pub fn record_error(&self, kind: &'static str) {
        self.processing_errors.fetch_add(1, Ordering::Relaxed);
        counter!("flood_processing_errors_total", "kind" => kind).increment(1);
    }

    pub fn record_flood_error(&self, kind: ErrorKind) {
        self.record_error(kind.as_str());
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let times = self.processing_times.read().await;
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            uploads: self.uploads.load(Ordering::Relaxed),
            processing_errors: self.processing_errors.load(Ordering::Relaxed),
            processed: times.count,
            avg_processing_ms: times.avg_ms(),
            min_processing_ms: times.min_us as f64 / 1000.0,
            max_processing_ms: times.max_us as f64 / 1000.0,
            last_processing_ms: times.last_us as f64 / 1000.0,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
