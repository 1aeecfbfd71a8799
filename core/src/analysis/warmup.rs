//! Cold-start warmup profiling
//!
//! Times successive executions over fresh clones and flags the inflection
//! point where the per-iteration cost first drops sharply — the point at
//! which allocator pools, branch predictors, and caches have warmed. There
//! is no JIT on this runtime; the curve reflects those colder effects and
//! whatever lazy initialization the algorithm itself performs.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, AlgorithmInput};
use crate::instrumentation::Probe;
use crate::measurement::alloc;
use crate::measurement::core::MeasurementError;

/// An iteration counts as the inflection point when its elapsed time drops
/// below this fraction of its predecessor's.
const INFLECTION_DROP_RATIO: f64 = 0.6;

/// One timed warmup iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupIteration {
    /// 1-based iteration index.
    pub iteration: usize,
    pub elapsed_ms: f64,
    /// True for at most one iteration: the first sharp drop.
    pub inflection: bool,
}

/// Profiles `iterations` successive executions over fresh clones of
/// `base_input`. With `quiesce_between`, the (no-op) collection quiesce is
/// invoked before every iteration for parity with the measured path.
pub fn profile_warmup(
    algorithm: &dyn Algorithm,
    base_input: &dyn AlgorithmInput,
    iterations: usize,
    quiesce_between: bool,
) -> Result<Vec<WarmupIteration>, MeasurementError> {
    let mut curve = Vec::with_capacity(iterations);
    let mut previous_ms = f64::MAX;
    let mut inflection_at = None;

    for iteration in 1..=iterations {
        if quiesce_between {
            alloc::quiesce();
        }

        let mut input = base_input.clone_boxed();
        let mut probe = Probe::disabled();
        let started = Instant::now();
        algorithm.execute(&mut *input, &mut probe)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;

        if iteration > 1
            && inflection_at.is_none()
            && elapsed_ms < previous_ms * INFLECTION_DROP_RATIO
        {
            inflection_at = Some(iteration);
        }

        curve.push(WarmupIteration {
            iteration,
            elapsed_ms,
            inflection: inflection_at == Some(iteration),
        });
        previous_ms = elapsed_ms;
    }

    Ok(curve)
}
