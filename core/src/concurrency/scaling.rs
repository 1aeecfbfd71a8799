//! Concurrency scaling analyzer (Amdahl)
//!
//! For each thread count t in 1..=max, spawns t workers over independent
//! clones of a template input, releases them through one barrier, and times
//! the fan-out with a single shared clock: started at release, stopped when
//! the slowest worker finishes. Speedup and efficiency follow directly;
//! the serial fraction is recovered by inverting Amdahl's law
//! `S = 1 / ((1 − P) + P/t)`, clamped at zero because scheduler noise can
//! push the estimate negative.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, AlgorithmInput};
use crate::instrumentation::Probe;
use crate::measurement::alloc;
use crate::measurement::core::MeasurementError;

/// One thread count's scaling measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    pub threads: usize,
    pub elapsed_ms: f64,
    pub speedup: f64,
    pub efficiency: f64,
    pub serial_fraction: f64,
}

/// Measures scaling behavior for t = 1..=max_threads, in order.
pub fn analyze_scaling(
    algorithm: &dyn Algorithm,
    base_input: &dyn AlgorithmInput,
    max_threads: usize,
) -> Result<Vec<ScalingPoint>, MeasurementError> {
    let mut points = Vec::with_capacity(max_threads);
    let mut base_elapsed_ms = 0.0;

    for threads in 1..=max_threads {
        alloc::quiesce();
        let elapsed_ms = run_fan_out(algorithm, base_input, threads)?;
        if threads == 1 {
            base_elapsed_ms = elapsed_ms;
        }

        let speedup = base_elapsed_ms / elapsed_ms;
        let efficiency = speedup / threads as f64;
        let serial_fraction = if threads > 1 {
            let parallel_fraction =
                (1.0 - 1.0 / speedup) / (1.0 - 1.0 / threads as f64);
            (1.0 - parallel_fraction).max(0.0)
        } else {
            1.0
        };

        log::debug!(
            "{}: t={threads} elapsed={elapsed_ms:.3}ms speedup={speedup:.3}",
            algorithm.name()
        );
        points.push(ScalingPoint {
            threads,
            elapsed_ms,
            speedup,
            efficiency,
            serial_fraction,
        });
    }

    Ok(points)
}

/// Spawns `threads` workers, rendezvouses all of them plus the coordinator
/// at one barrier, and times from release to the slowest join. Cloning
/// happens strictly before the rendezvous, so no worker's setup cost lands
/// inside the timed region.
fn run_fan_out(
    algorithm: &dyn Algorithm,
    base_input: &dyn AlgorithmInput,
    threads: usize,
) -> Result<f64, MeasurementError> {
    let barrier = Barrier::new(threads + 1);

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let mut input = base_input.clone_boxed();
            let barrier = &barrier;
            handles.push(scope.spawn(move || {
                let mut probe = Probe::disabled();
                barrier.wait();
                algorithm.execute(&mut *input, &mut probe)
            }));
        }

        barrier.wait();
        let started = Instant::now();
        for handle in handles {
            handle
                .join()
                .map_err(|_| MeasurementError::WorkerPanicked)??;
        }
        Ok(started.elapsed().as_secs_f64() * 1e3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmError;

    /// Deterministic busy work over a private clone.
    struct SpinSort;

    impl Algorithm for SpinSort {
        fn name(&self) -> &str {
            "Spin Sort"
        }

        fn category(&self) -> &str {
            "Sorting"
        }

        fn execute(
            &self,
            input: &mut dyn AlgorithmInput,
            _probe: &mut Probe,
        ) -> Result<(), AlgorithmError> {
            let values = input
                .as_any_mut()
                .downcast_mut::<Vec<i64>>()
                .ok_or_else(|| AlgorithmError::UnsupportedInput {
                    algorithm: "Spin Sort".to_owned(),
                    expected: "Vec<i64>",
                })?;
            values.sort_unstable();
            values.reverse();
            values.sort_unstable();
            Ok(())
        }
    }

    #[test]
    fn produces_one_point_per_thread_count() {
        let _ = env_logger::builder().is_test(true).try_init();
        let input: Vec<i64> = (0..20_000).rev().collect();
        let points = analyze_scaling(&SpinSort, &input, 4).unwrap();

        assert_eq!(points.len(), 4);
        let threads: Vec<usize> = points.iter().map(|p| p.threads).collect();
        assert_eq!(threads, vec![1, 2, 3, 4]);
    }

    #[test]
    fn single_thread_is_the_efficiency_baseline() {
        let input: Vec<i64> = (0..10_000).rev().collect();
        let points = analyze_scaling(&SpinSort, &input, 2).unwrap();

        assert_eq!(points[0].speedup, 1.0);
        assert_eq!(points[0].efficiency, 1.0);
        assert_eq!(points[0].serial_fraction, 1.0);
    }

    #[test]
    fn serial_fraction_is_clamped_non_negative() {
        let input: Vec<i64> = (0..5_000).rev().collect();
        let points = analyze_scaling(&SpinSort, &input, 4).unwrap();
        // The clamped zero is a defined floor, not evidence of a perfect
        // parallel fit.
        assert!(points.iter().all(|p| p.serial_fraction >= 0.0));
    }

    #[test]
    fn worker_failure_propagates() {
        struct Failing;

        impl Algorithm for Failing {
            fn name(&self) -> &str {
                "Failing"
            }

            fn category(&self) -> &str {
                "Sorting"
            }

            fn execute(
                &self,
                _input: &mut dyn AlgorithmInput,
                _probe: &mut Probe,
            ) -> Result<(), AlgorithmError> {
                Err(AlgorithmError::ExecutionFailed("boom".to_owned()))
            }
        }

        let input: Vec<i64> = vec![1, 2, 3];
        assert!(analyze_scaling(&Failing, &input, 2).is_err());
    }
}
