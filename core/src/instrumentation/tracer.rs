//! Deterministic micro-operation execution tracer
//!
//! Records an ordered log of the elementary operations an algorithm
//! performs (comparisons, assignments, swaps, traversals) while active.
//! When inactive, [`Tracer::record`] is a true no-op: one inlined flag
//! check, no allocation, no branch beyond the check. Algorithms call the
//! tracer unconditionally; the measurement core decides whether a run is
//! traced by handing over an enabled or disabled probe.

use serde::{Deserialize, Serialize};

/// Elementary operation classes recognized by the tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Comparison,
    Assignment,
    Swap,
    Traversal,
}

impl OperationKind {
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Comparison => "comparison",
            OperationKind::Assignment => "assignment",
            OperationKind::Swap => "swap",
            OperationKind::Traversal => "traversal",
        }
    }
}

/// One recorded operation: kind plus free-form detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub kind: OperationKind,
    pub detail: String,
}

/// Append-only, explicitly owned operation log.
#[derive(Debug, Default)]
pub struct Tracer {
    active: bool,
    records: Vec<OperationRecord>,
}

impl Tracer {
    /// A tracer that starts recording immediately.
    pub fn enabled() -> Self {
        Self {
            active: true,
            records: Vec::new(),
        }
    }

    /// Begins (or resumes) recording. The existing log is kept; a fresh
    /// tracer per run is the normal discipline.
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stops recording. The accumulated log remains readable.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Appends one operation while active. Guaranteed no-op otherwise: the
    /// detail string is not materialized unless the record is kept.
    #[inline]
    pub fn record(&mut self, kind: OperationKind, detail: &str) {
        if !self.active {
            return;
        }
        self.records.push(OperationRecord {
            kind,
            detail: detail.to_owned(),
        });
    }

    /// The ordered trace accumulated so far.
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    /// Deterministic frame-by-frame replay of the trace.
    pub fn replay(&self) -> impl Iterator<Item = &OperationRecord> {
        self.records.iter()
    }

    /// Count of recorded operations per kind, for summary metrics.
    pub fn counts(&self) -> [(OperationKind, usize); 4] {
        let mut comparison = 0;
        let mut assignment = 0;
        let mut swap = 0;
        let mut traversal = 0;
        for record in &self.records {
            match record.kind {
                OperationKind::Comparison => comparison += 1,
                OperationKind::Assignment => assignment += 1,
                OperationKind::Swap => swap += 1,
                OperationKind::Traversal => traversal += 1,
            }
        }
        [
            (OperationKind::Comparison, comparison),
            (OperationKind::Assignment, assignment),
            (OperationKind::Swap, swap),
            (OperationKind::Traversal, traversal),
        ]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
