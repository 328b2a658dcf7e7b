//! Service counters and latency statistics.
//!
//! These are owned by the service layer and injected into the HTTP handlers;
//! the scoring engine itself never touches them.

use crate::types::prediction::{BatchResult, RiskLevel};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Metrics collector for the scoring service
pub struct ServiceMetrics {
    /// Prediction requests received
    pub requests_total: AtomicU64,
    /// Prediction requests rejected at validation
    pub requests_rejected: AtomicU64,
    /// Transactions scored across all batches
    pub transactions_scored: AtomicU64,
    predictions_low: AtomicU64,
    predictions_medium: AtomicU64,
    predictions_high: AtomicU64,
    /// Per-transaction scoring times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Risk score distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for uptime and rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            transactions_scored: AtomicU64::new(0),
            predictions_low: AtomicU64::new(0),
            predictions_medium: AtomicU64::new(0),
            predictions_high: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    pub fn record_request(&self) -> u64 {
        self.requests_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_rejection(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a single scored transaction
    pub fn record_prediction(&self, processing_time: Duration, risk_score: f64, level: RiskLevel) {
        self.transactions_scored.fetch_add(1, Ordering::Relaxed);

        let counter = match level {
            RiskLevel::Low => &self.predictions_low,
            RiskLevel::Medium => &self.predictions_medium,
            RiskLevel::High => &self.predictions_high,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent half once full
            if times.len() > MAX_LATENCY_SAMPLES {
                times.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }

        let bucket = ((risk_score * 10.0).max(0.0) as usize).min(9);
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record every prediction of a scored batch
    pub fn record_batch(&self, batch: &BatchResult) {
        for prediction in &batch.predictions {
            self.record_prediction(
                prediction.processing_time,
                prediction.risk_score,
                prediction.risk_level,
            );
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted: Vec<u64> = match self.processing_times.read() {
            Ok(times) => times.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if sorted.is_empty() {
            return ProcessingStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (transactions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.transactions_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn get_score_distribution(&self) -> [u64; 10] {
        match self.score_buckets.read() {
            Ok(buckets) => *buckets,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.uptime().as_secs_f64(),
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            transactions_scored: self.transactions_scored.load(Ordering::Relaxed),
            predictions_by_level: LevelCounts {
                low: self.predictions_low.load(Ordering::Relaxed),
                medium: self.predictions_medium.load(Ordering::Relaxed),
                high: self.predictions_high.load(Ordering::Relaxed),
            },
            throughput_per_sec: self.get_throughput(),
            processing: self.get_processing_stats(),
            score_distribution: self.get_score_distribution(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let levels = &snapshot.predictions_by_level;
        let processing = &snapshot.processing;
        let fraud_rate = if snapshot.transactions_scored > 0 {
            levels.high as f64 / snapshot.transactions_scored as f64 * 100.0
        } else {
            0.0
        };

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            FRAUDGUARD RISK ENGINE - METRICS SUMMARY          ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests: {:>8} (rejected {:>6})  │  Uptime: {:>8.0}s    ║",
            snapshot.requests_total, snapshot.requests_rejected, snapshot.uptime_seconds
        );
        info!(
            "║ Transactions Scored: {:>8}  │  Throughput: {:>6.1} tx/s    ║",
            snapshot.transactions_scored, snapshot.throughput_per_sec
        );
        info!(
            "║ Levels: low={:>6} medium={:>6} high={:>6} ({:>5.1}% fraud) ║",
            levels.low, levels.medium, levels.high, fraud_rate
        );
        info!(
            "║ Scoring Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5}  ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Risk Score Distribution:                                     ║");
        let total: u64 = snapshot.score_distribution.iter().sum();
        for (i, &count) in snapshot.score_distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct LevelCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Serializable view of the service counters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_seconds: f64,
    pub requests_total: u64,
    pub requests_rejected: u64,
    pub transactions_scored: u64,
    pub predictions_by_level: LevelCounts,
    pub throughput_per_sec: f64,
    pub processing: ProcessingStats,
    pub score_distribution: [u64; 10],
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // The first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
