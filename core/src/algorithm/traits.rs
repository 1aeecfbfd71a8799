//! Core algorithm trait definitions for the METRON observatory
//!
//! This module establishes the capability contract every benchmarked
//! algorithm satisfies. The contract is deliberately narrow: an identity,
//! a category, and a side-effecting `execute` over an opaque input. The
//! measured subject is the side effect; there is no return channel.
//!
//! # Key Design Principles
//! - Algorithms may mutate their input destructively (in-place sorts are
//!   the canonical case); callers own the cloning discipline.
//! - Instrumentation is an explicit handle threaded through the call, never
//!   ambient thread-local state. A disabled probe compiles down to a flag
//!   check.

use thiserror::Error;

use crate::algorithm::input::AlgorithmInput;
use crate::instrumentation::Probe;

/// Errors surfaced by algorithm execution and its collaborators.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    /// The opaque input did not downcast to the shape this algorithm's
    /// category conventionally receives.
    #[error("unsupported input shape for {algorithm}: expected {expected}")]
    UnsupportedInput {
        algorithm: String,
        expected: &'static str,
    },

    /// The input-generation collaborator has no convention for a category.
    #[error("no input convention for category: {0}")]
    UnknownCategory(String),

    /// The algorithm itself failed mid-execution.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Capability contract for an algorithm under test.
///
/// # Invariants
/// - Thread-safe: `execute` may be invoked concurrently from independent
///   workers, each owning a private input clone.
/// - Deterministic for a given input, up to the measured timing itself.
pub trait Algorithm: Send + Sync {
    /// Unique, human-readable identity ("Quick Sort", "Hash Table", ...).
    fn name(&self) -> &str;

    /// Category grouping ("Sorting", "Graph", ...). The relationship between
    /// category and input shape is a documented convention, not statically
    /// enforced.
    fn category(&self) -> &str;

    /// Runs the algorithm over `input`, mutating it in place. The probe
    /// receives micro-operation and memory-access events when active and is
    /// a guaranteed no-op when disabled.
    fn execute(
        &self,
        input: &mut dyn AlgorithmInput,
        probe: &mut Probe,
    ) -> Result<(), AlgorithmError>;
}
