//! METRON Instrumentation Layer
//! Explicit, zero-overhead-when-disabled micro-operation and memory-access recording
//! Copyright (c) 2026 Metron Contributors

pub mod cache;
pub mod tracer;

pub use self::cache::{CacheLocalityAnalyzer, CacheLocalityReport};
pub use self::tracer::{OperationKind, OperationRecord, Tracer};

/// Instrumentation handle threaded through every measured `execute` call.
///
/// Bundles the micro-operation tracer and the cache locality analyzer. The
/// disabled probe is the null object: every recording entry point reduces
/// to an inlined flag check, which is a correctness requirement of the
/// measurement core, not an optimization.
#[derive(Debug, Default)]
pub struct Probe {
    pub tracer: Tracer,
    pub cache: CacheLocalityAnalyzer,
}

impl Probe {
    /// A probe with every recorder disabled.
    pub fn disabled() -> Self {
        Self::default()
    }
}
