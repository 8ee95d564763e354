//! Performance and decision metrics for the scoring pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for pipeline behavior
pub struct PipelineMetrics {
    /// Total evaluations completed
    pub evaluations_completed: AtomicU64,
    /// Decisions taken via the deterministic fallback rule
    pub fallback_decisions: AtomicU64,
    /// Evaluations by final decision
    decisions: RwLock<HashMap<String, u64>>,
    /// Evaluation latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for throughput calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            evaluations_completed: AtomicU64::new(0),
            fallback_decisions: AtomicU64::new(0),
            decisions: RwLock::new(HashMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record one completed evaluation
    pub fn record_evaluation(&self, latency: Duration, decision: &str, used_fallback: bool) {
        self.evaluations_completed.fetch_add(1, Ordering::Relaxed);
        if used_fallback {
            self.fallback_decisions.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut decisions) = self.decisions.write() {
            *decisions.entry(decision.to_string()).or_insert(0) += 1;
        }

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent samples
            if latencies.len() > 10_000 {
                latencies.drain(0..5_000);
            }
        }
    }

    /// Get latency statistics over the retained samples
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = self.latencies.read().unwrap();
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (evaluations per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.evaluations_completed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Fraction of decisions that used the fallback rule
    pub fn get_fallback_rate(&self) -> f64 {
        let total = self.evaluations_completed.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.fallback_decisions.load(Ordering::Relaxed) as f64 / total as f64
    }

    /// Get evaluation counts by decision
    pub fn get_decisions(&self) -> HashMap<String, u64> {
        self.decisions.read().unwrap().clone()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let total = self.evaluations_completed.load(Ordering::Relaxed);
        let fallbacks = self.fallback_decisions.load(Ordering::Relaxed);
        let latency = self.get_latency_stats();
        let throughput = self.get_throughput();
        let decisions = self.get_decisions();

        info!(
            evaluations = total,
            throughput = format!("{:.1}/s", throughput),
            fallback_rate = format!("{:.1}%", self.get_fallback_rate() * 100.0),
            fallbacks,
            "Pipeline metrics summary"
        );
        info!(
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            p99_us = latency.p99_us,
            "Evaluation latency"
        );
        for (decision, count) in &decisions {
            let pct = if total > 0 {
                (*count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            info!(decision = %decision, count, pct = format!("{pct:.1}%"), "Decisions");
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluation latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_evaluation(Duration::from_micros(100), "LOW_RISK", false);
        metrics.record_evaluation(Duration::from_micros(200), "MID_RISK", true);

        assert_eq!(metrics.evaluations_completed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.fallback_decisions.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.get_decisions().get("MID_RISK"), Some(&1));
    }

    #[test]
    fn test_fallback_rate() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.get_fallback_rate(), 0.0);

        metrics.record_evaluation(Duration::from_micros(100), "LOW_RISK", true);
        metrics.record_evaluation(Duration::from_micros(100), "LOW_RISK", true);
        metrics.record_evaluation(Duration::from_micros(100), "LOW_RISK", false);
        metrics.record_evaluation(Duration::from_micros(100), "LOW_RISK", false);

        assert!((metrics.get_fallback_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_latency_stats() {
        let metrics = PipelineMetrics::new();
        for us in [100u64, 200, 300, 400] {
            metrics.record_evaluation(Duration::from_micros(us), "LOW_RISK", false);
        }

        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.max_us, 400);
    }
}
