//! Cache locality and memory stride analyzer
//!
//! Consumes a stream of virtual address identifiers emitted by an
//! instrumented algorithm and derives stride statistics, cache-line
//! crossing rates, and a [0, 1] locality score. The identifiers are
//! whatever the algorithm chooses to report (element indices scaled by
//! element size are typical); the analysis is a model over that stream,
//! not a hardware measurement.

use serde::{Deserialize, Serialize};

/// Default cache line granularity for crossing detection.
pub const DEFAULT_CACHE_LINE_BYTES: u64 = 64;

/// Derived locality metrics for one recorded access stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheLocalityReport {
    pub average_stride: f64,
    pub stride_variance: f64,
    pub crossing_rate: f64,
    pub miss_probability: f64,
    /// 1.0 is perfectly local; fewer than two recorded accesses are
    /// trivially local.
    pub locality_score: f64,
}

impl CacheLocalityReport {
    fn trivially_local() -> Self {
        Self {
            average_stride: 0.0,
            stride_variance: 0.0,
            crossing_rate: 0.0,
            miss_probability: 0.0,
            locality_score: 1.0,
        }
    }
}

/// Explicitly owned access-stream recorder.
#[derive(Debug)]
pub struct CacheLocalityAnalyzer {
    active: bool,
    line_bytes: u64,
    accesses: Vec<u64>,
}

impl Default for CacheLocalityAnalyzer {
    fn default() -> Self {
        Self {
            active: false,
            line_bytes: DEFAULT_CACHE_LINE_BYTES,
            accesses: Vec::new(),
        }
    }
}

impl CacheLocalityAnalyzer {
    /// An analyzer recording immediately, with the given line granularity.
    pub fn enabled(line_bytes: u64) -> Self {
        Self {
            active: true,
            line_bytes: line_bytes.max(1),
            accesses: Vec::with_capacity(10_000),
        }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn line_bytes(&self) -> u64 {
        self.line_bytes
    }

    /// Appends one address identifier while active; no-op otherwise.
    #[inline]
    pub fn record_access(&mut self, address: u64) {
        if !self.active {
            return;
        }
        self.accesses.push(address);
    }

    /// Stops recording and reduces the stream to locality metrics.
    pub fn stop_and_analyze(&mut self) -> CacheLocalityReport {
        self.active = false;
        if self.accesses.len() < 2 {
            return CacheLocalityReport::trivially_local();
        }

        let mut strides: Vec<u64> = Vec::with_capacity(self.accesses.len() - 1);
        let mut crossings = 0usize;
        for window in self.accesses.windows(2) {
            let (prev, curr) = (window[0], window[1]);
            strides.push(prev.abs_diff(curr));
            if prev / self.line_bytes != curr / self.line_bytes {
                crossings += 1;
            }
        }

        let count = strides.len() as f64;
        let average_stride = strides.iter().map(|&s| s as f64).sum::<f64>() / count;
        let stride_variance = strides
            .iter()
            .map(|&s| {
                let d = s as f64 - average_stride;
                d * d
            })
            .sum::<f64>()
            / count;
        let crossing_rate = crossings as f64 / count;

        let miss_probability =
            (crossing_rate * (average_stride / self.line_bytes as f64)).min(1.0);
        let locality_score = (1.0 - miss_probability).max(0.0);

        CacheLocalityReport {
            average_stride,
            stride_variance,
            crossing_rate,
            miss_probability,
            locality_score,
        }
    }
}
