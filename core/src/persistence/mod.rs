//! METRON Persistence Interface
//! Sink contract for completed run statistics, grouped by batch on read
//! Copyright (c) 2026 Metron Contributors
//!
//! Durable storage and export live outside this engine; the core only
//! pushes completed [`RunStatistics`] (batch identifier included) into a
//! sink. The in-memory sink backs tests and ad-hoc harnesses.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::measurement::statistics::{BatchId, RunStatistics};

/// Accepts completed run statistics, extended metrics included.
pub trait ResultSink: Send + Sync {
    fn persist(&self, stats: &RunStatistics);
}

/// In-memory reference sink.
#[derive(Default)]
pub struct MemorySink {
    runs: RwLock<Vec<RunStatistics>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.runs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.read().is_empty()
    }

    /// Read path: persisted runs grouped by batch, insertion-ordered
    /// within each batch.
    pub fn by_batch(&self) -> BTreeMap<BatchId, Vec<RunStatistics>> {
        let mut grouped: BTreeMap<BatchId, Vec<RunStatistics>> = BTreeMap::new();
        for stats in self.runs.read().iter() {
            grouped
                .entry(stats.batch_id)
                .or_default()
                .push(stats.clone());
        }
        grouped
    }
}

impl ResultSink for MemorySink {
    fn persist(&self, stats: &RunStatistics) {
        self.runs.write().push(stats.clone());
    }
}
