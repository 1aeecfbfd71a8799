//! Experiment orchestration across a size sweep
//!
//! Iterates `min, min+step, ..., <= max`, derives a frozen per-size
//! configuration for each, and delegates to the measurement core. The
//! control plane the orchestrator requires from its caller is exactly two
//! primitives: a cooperative cancellation token and a progress-percentage
//! sink. Cancellation is polled at size boundaries only and yields the
//! partial, well-formed result set accumulated so far — never an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::algorithm::{Algorithm, InputGenerator};
use crate::measurement::config::{ConfigError, ExperimentConfig};
use crate::measurement::core::{MeasurementCore, MeasurementError};
use crate::measurement::statistics::{BatchId, RunStatistics};

/// Cooperative cancellation signal, clone-shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Work already started runs to completion;
    /// the signal is honored at the next size or repetition boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress-percentage callback, reported after each completed size.
pub trait ProgressSink {
    fn report(&mut self, percent: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn report(&mut self, percent: f64) {
        self(percent)
    }
}

/// Sweep failures: configuration validation (raised before any execution)
/// or a runtime measurement failure propagated from an in-flight size.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

/// Drives the measurement core across a swept size range.
pub struct ExperimentOrchestrator {
    core: MeasurementCore,
}

impl ExperimentOrchestrator {
    pub fn new(generator: Arc<dyn InputGenerator>) -> Self {
        Self {
            core: MeasurementCore::new(generator),
        }
    }

    pub fn with_core(core: MeasurementCore) -> Self {
        Self { core }
    }

    pub fn measurement_core(&self) -> &MeasurementCore {
        &self.core
    }

    /// Runs one sweep, returning statistics ordered by input size.
    ///
    /// The sweep is stamped with a fresh batch identifier. A measured
    /// repetition failure aborts the sweep and propagates; the orchestrator
    /// never retries a failing size. Cancellation returns the accumulated
    /// prefix.
    pub fn run_sweep(
        &self,
        algorithm: &dyn Algorithm,
        config: &ExperimentConfig,
        cancel: &CancelToken,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<RunStatistics>, ExperimentError> {
        let config = config.validated()?;
        let batch_id = BatchId::generate();
        let total_sizes = config.sweep_len();
        let mut results = Vec::with_capacity(total_sizes);

        log::info!(
            "sweep {batch_id}: {} over sizes {}..={} step {}, {} repetitions",
            algorithm.name(),
            config.min_size,
            config.max_size,
            config.step,
            config.repetitions
        );

        let mut completed = 0usize;
        let mut size = config.min_size;
        loop {
            if size > config.max_size {
                break;
            }
            if cancel.is_cancelled() {
                log::info!("sweep {batch_id} cancelled after {completed} of {total_sizes} sizes");
                break;
            }

            let derived = config.for_size(size);
            match self.core.run_single(algorithm, &derived, batch_id, cancel)? {
                Some(stats) => results.push(stats),
                // Cancelled before any repetition completed at this size.
                None => break,
            }

            completed += 1;
            progress.report(completed as f64 / total_sizes as f64 * 100.0);

            size = match size.checked_add(config.step) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(results)
    }
}
