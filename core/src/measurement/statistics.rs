//! Measurement samples and summarized run statistics
//!
//! A [`MeasurementSample`] is one repetition's raw reading; samples are
//! ephemeral and reduce immediately into one immutable [`RunStatistics`]
//! per swept size. Extended metrics are namespaced string entries attached
//! by optional hooks (tracer, cache analyzer, energy model, allocation
//! profiler) without touching the primary statistics.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier grouping every run of one sweep for later analysis/export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BatchId(Uuid);

impl BatchId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One repetition's raw reading.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementSample {
    pub elapsed: Duration,
    pub allocated_bytes: u64,
}

impl MeasurementSample {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }
}

/// Immutable summary of all repetitions at one swept size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub batch_id: BatchId,
    pub algorithm: String,
    pub category: String,
    pub input_size: usize,
    pub avg_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub std_dev_time_ms: f64,
    pub avg_allocated_bytes: f64,
    pub timestamp: DateTime<Utc>,
    /// Namespaced entries attached by optional extension hooks
    /// (`tracer.*`, `cache.*`, `energy.*`, `alloc.*`).
    pub extended_metrics: BTreeMap<String, String>,
}

impl RunStatistics {
    /// Reduces the sample list for one swept size. At least one sample is
    /// an invariant of the measurement core.
    pub(crate) fn from_samples(
        batch_id: BatchId,
        algorithm: &str,
        category: &str,
        input_size: usize,
        samples: &[MeasurementSample],
    ) -> Self {
        let times: Vec<f64> = samples.iter().map(MeasurementSample::elapsed_ms).collect();
        let allocations: Vec<f64> = samples.iter().map(|s| s.allocated_bytes as f64).collect();

        Self {
            batch_id,
            algorithm: algorithm.to_owned(),
            category: category.to_owned(),
            input_size,
            avg_time_ms: mean(&times),
            min_time_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_time_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev_time_ms: sample_std_dev(&times),
            avg_allocated_bytes: mean(&allocations),
            timestamp: Utc::now(),
            extended_metrics: BTreeMap::new(),
        }
    }

    /// Attaches one namespaced extended metric.
    pub fn attach_metric(&mut self, key: &str, value: String) {
        self.extended_metrics.insert(key.to_owned(), value);
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the n−1 denominator; 0 when n ≤ 1.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
