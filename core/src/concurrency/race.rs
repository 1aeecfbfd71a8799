//! Synchronized head-to-head race
//!
//! Every competitor clones the shared template input, all of them
//! rendezvous at one barrier, and each measures its own elapsed time and
//! thread-local allocation after release. The barrier makes the start
//! fair; finishes are independent — there is no shared stop signal.
//! Results are stable-sorted ascending by elapsed time and ranked 1-based.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, AlgorithmError, AlgorithmInput};
use crate::instrumentation::Probe;
use crate::measurement::alloc;
use crate::measurement::core::MeasurementError;

/// One competitor's finishing measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub competitor: String,
    pub elapsed_ms: f64,
    pub allocated_bytes: u64,
    /// 1-based position after the full race completed.
    pub rank: usize,
}

/// Races the competitors over independent clones of `shared_input`.
///
/// Fewer than two competitors is not a race: returns empty.
pub fn run_race(
    competitors: &[&dyn Algorithm],
    shared_input: &dyn AlgorithmInput,
) -> Result<Vec<RaceResult>, MeasurementError> {
    let lanes = competitors.len();
    if lanes < 2 {
        return Ok(Vec::new());
    }

    log::debug!("race across {lanes} competitors");
    let barrier = Barrier::new(lanes + 1);
    let (sender, receiver) = bounded::<(usize, f64, u64, Result<(), AlgorithmError>)>(lanes);

    thread::scope(|scope| {
        for (lane, competitor) in competitors.iter().enumerate() {
            let mut input = shared_input.clone_boxed();
            let barrier = &barrier;
            let sender = sender.clone();
            scope.spawn(move || {
                let mut probe = Probe::disabled();
                barrier.wait();

                let bytes_before = alloc::thread_allocated_bytes();
                let started = Instant::now();
                let outcome = competitor.execute(&mut *input, &mut probe);
                let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
                let allocated = alloc::thread_allocated_bytes().saturating_sub(bytes_before);

                // Receiver outlives the scope; the channel holds one slot
                // per lane, so this send never blocks or fails.
                let _ = sender.send((lane, elapsed_ms, allocated, outcome));
            });
        }
        barrier.wait();
    });
    drop(sender);

    let mut finishes: Vec<(usize, f64, u64)> = Vec::with_capacity(lanes);
    for (lane, elapsed_ms, allocated, outcome) in receiver.iter() {
        outcome?;
        finishes.push((lane, elapsed_ms, allocated));
    }

    // Stable order: competitor declaration order breaks exact-time ties.
    finishes.sort_by_key(|&(lane, _, _)| lane);
    finishes.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(finishes
        .into_iter()
        .enumerate()
        .map(|(position, (lane, elapsed_ms, allocated_bytes))| RaceResult {
            competitor: competitors[lane].name().to_owned(),
            elapsed_ms,
            allocated_bytes,
            rank: position + 1,
        })
        .collect())
}
