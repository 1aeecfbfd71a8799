//! Measurement core: one algorithm, one input size
//!
//! Runs one warmup pass plus `repetitions` measured executions of an
//! algorithm over independently cloned inputs and reduces the samples into
//! one [`RunStatistics`]. Warmup failures are swallowed; measured failures
//! propagate and abort the call. Optional hooks (tracer, cache analyzer,
//! energy model, allocation profiler) attach namespaced extended metrics
//! without altering the primary statistics.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::adversarial::AdversarialEngine;
use crate::algorithm::{Algorithm, AlgorithmError, AlgorithmInput, InputGenerator};
use crate::analysis::{allocation, energy};
use crate::instrumentation::{CacheLocalityAnalyzer, Probe, Tracer};
use crate::measurement::alloc;
use crate::measurement::config::ExperimentConfig;
use crate::measurement::orchestrator::CancelToken;
use crate::measurement::statistics::{BatchId, MeasurementSample, RunStatistics};

/// Runtime measurement failures, distinct from configuration validation.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    #[error("worker thread panicked during measured execution")]
    WorkerPanicked,
}

/// Warmup-plus-repetitions measurement engine for a single swept size.
pub struct MeasurementCore {
    generator: Arc<dyn InputGenerator>,
    adversarial: AdversarialEngine,
}

impl MeasurementCore {
    /// A core with the default adversarial generator registry.
    pub fn new(generator: Arc<dyn InputGenerator>) -> Self {
        Self {
            generator,
            adversarial: AdversarialEngine::with_defaults(),
        }
    }

    pub fn adversarial(&self) -> &AdversarialEngine {
        &self.adversarial
    }

    pub fn adversarial_mut(&mut self) -> &mut AdversarialEngine {
        &mut self.adversarial
    }

    /// Measures `algorithm` at `config.input_size`.
    ///
    /// Returns `Ok(None)` when cancelled before any repetition completed;
    /// cancellation after at least one completed repetition yields the
    /// statistics of the completed samples. Cancellation is polled at
    /// repetition boundaries only; a repetition already started runs to
    /// completion.
    pub fn run_single(
        &self,
        algorithm: &dyn Algorithm,
        config: &ExperimentConfig,
        batch_id: BatchId,
        cancel: &CancelToken,
    ) -> Result<Option<RunStatistics>, MeasurementError> {
        let master = self.master_input(algorithm, config)?;

        // Warmup on a clone; failures are discarded, never surfaced.
        let mut warmup_input = master.clone_boxed();
        let mut warmup_probe = Probe::disabled();
        if let Err(discarded) = algorithm.execute(&mut *warmup_input, &mut warmup_probe) {
            log::debug!(
                "warmup failure discarded for {}: {discarded}",
                algorithm.name()
            );
        }

        let mut probe = probe_for(config);
        let mut samples: Vec<MeasurementSample> = Vec::with_capacity(config.repetitions);

        for repetition in 0..config.repetitions {
            if cancel.is_cancelled() {
                log::debug!(
                    "{} cancelled at repetition {repetition} of {}",
                    algorithm.name(),
                    config.repetitions
                );
                break;
            }

            let mut input = master.clone_boxed();
            alloc::quiesce();

            let bytes_before = alloc::thread_allocated_bytes();
            let started = Instant::now();
            algorithm.execute(&mut *input, &mut probe)?;
            let elapsed = started.elapsed();
            let allocated_bytes = alloc::thread_allocated_bytes().saturating_sub(bytes_before);

            samples.push(MeasurementSample {
                elapsed,
                allocated_bytes,
            });
        }

        if samples.is_empty() {
            return Ok(None);
        }

        let mut stats = RunStatistics::from_samples(
            batch_id,
            algorithm.name(),
            algorithm.category(),
            config.input_size,
            &samples,
        );
        self.attach_extended_metrics(algorithm, config, &*master, &mut probe, &mut stats)?;
        Ok(Some(stats))
    }

    /// Adversarial synthesis takes precedence over the standard generator
    /// when enabled and a generator is registered for this identity.
    fn master_input(
        &self,
        algorithm: &dyn Algorithm,
        config: &ExperimentConfig,
    ) -> Result<Box<dyn AlgorithmInput>, MeasurementError> {
        if config.adversarial {
            if let Some(input) = self.adversarial.generate(
                algorithm.name(),
                config.input_size,
                config.adversarial_seed,
            ) {
                return Ok(input);
            }
            log::warn!(
                "no adversarial generator for {}; using the standard input",
                algorithm.name()
            );
        }
        Ok(self
            .generator
            .generate(config, algorithm.category(), algorithm.name())?)
    }

    fn attach_extended_metrics(
        &self,
        algorithm: &dyn Algorithm,
        config: &ExperimentConfig,
        master: &dyn AlgorithmInput,
        probe: &mut Probe,
        stats: &mut RunStatistics,
    ) -> Result<(), MeasurementError> {
        if config.trace_operations {
            probe.tracer.stop();
            stats.attach_metric("tracer.operations", probe.tracer.len().to_string());
            let breakdown: std::collections::BTreeMap<&str, usize> = probe
                .tracer
                .counts()
                .iter()
                .map(|&(kind, count)| (kind.label(), count))
                .collect();
            if let Ok(json) = serde_json::to_string(&breakdown) {
                stats.attach_metric("tracer.breakdown", json);
            }
        }

        if config.analyze_cache_locality {
            let report = probe.cache.stop_and_analyze();
            stats.attach_metric("cache.avg_stride", format!("{:.2}", report.average_stride));
            stats.attach_metric(
                "cache.crossing_rate",
                format!("{:.4}", report.crossing_rate),
            );
            stats.attach_metric(
                "cache.locality_score",
                format!("{:.4}", report.locality_score),
            );
        }

        if config.estimate_energy {
            let estimate = energy::estimate(
                stats.avg_time_ms,
                stats.avg_allocated_bytes as u64,
                probe.tracer.len() as u64,
            );
            stats.attach_metric("energy.joules", format!("{:.3e}", estimate.joules));
            stats.attach_metric(
                "energy.carbon_grams",
                format!("{:.3e}", estimate.carbon_grams),
            );
            stats.attach_metric("energy.cycles", estimate.modeled_cpu_cycles.to_string());
        }

        if config.profile_allocations {
            let topology = allocation::profile(algorithm, master)?;
            stats.attach_metric("alloc.bytes", topology.allocated_bytes.to_string());
            stats.attach_metric("alloc.count", topology.allocation_count.to_string());
            stats.attach_metric(
                "alloc.pressure",
                format!("{:.2}", topology.pressure_score),
            );
        }

        Ok(())
    }
}

fn probe_for(config: &ExperimentConfig) -> Probe {
    Probe {
        tracer: if config.trace_operations {
            Tracer::enabled()
        } else {
            Tracer::default()
        },
        cache: if config.analyze_cache_locality {
            CacheLocalityAnalyzer::enabled(config.cache_line_bytes)
        } else {
            CacheLocalityAnalyzer::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::instrumentation::OperationKind;

    /// Generates a reverse-sorted integer vector of the configured size.
    struct ReverseVecGenerator;

    impl InputGenerator for ReverseVecGenerator {
        fn generate(
            &self,
            config: &ExperimentConfig,
            _category: &str,
            _identity: &str,
        ) -> Result<Box<dyn AlgorithmInput>, AlgorithmError> {
            let values: Vec<i64> = (0..config.input_size as i64).rev().collect();
            Ok(Box::new(values))
        }
    }

    /// In-place insertion sort that reports comparisons to the probe.
    struct InsertionSort;

    impl Algorithm for InsertionSort {
        fn name(&self) -> &str {
            "Insertion Sort"
        }

        fn category(&self) -> &str {
            "Sorting"
        }

        fn execute(
            &self,
            input: &mut dyn AlgorithmInput,
            probe: &mut Probe,
        ) -> Result<(), AlgorithmError> {
            let values = input
                .as_any_mut()
                .downcast_mut::<Vec<i64>>()
                .ok_or_else(|| AlgorithmError::UnsupportedInput {
                    algorithm: "Insertion Sort".to_owned(),
                    expected: "Vec<i64>",
                })?;
            for i in 1..values.len() {
                let mut j = i;
                while j > 0 {
                    probe.tracer.record(OperationKind::Comparison, "values[j-1] > values[j]");
                    if values[j - 1] > values[j] {
                        values.swap(j - 1, j);
                        probe.tracer.record(OperationKind::Swap, "adjacent");
                        j -= 1;
                    } else {
                        break;
                    }
                }
            }
            Ok(())
        }
    }

    /// Captures every input it is executed with.
    struct CapturingAlgorithm {
        seen: Mutex<Vec<Vec<i64>>>,
    }

    impl CapturingAlgorithm {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Algorithm for CapturingAlgorithm {
        fn name(&self) -> &str {
            "Quick Sort"
        }

        fn category(&self) -> &str {
            "Sorting"
        }

        fn execute(
            &self,
            input: &mut dyn AlgorithmInput,
            _probe: &mut Probe,
        ) -> Result<(), AlgorithmError> {
            let values = input.as_any().downcast_ref::<Vec<i64>>().unwrap();
            self.seen.lock().unwrap().push(values.clone());
            Ok(())
        }
    }

    /// Fails on its first invocation (the warmup), succeeds afterwards.
    struct FlakyWarmup {
        calls: AtomicUsize,
    }

    impl Algorithm for FlakyWarmup {
        fn name(&self) -> &str {
            "Flaky"
        }

        fn category(&self) -> &str {
            "Sorting"
        }

        fn execute(
            &self,
            _input: &mut dyn AlgorithmInput,
            _probe: &mut Probe,
        ) -> Result<(), AlgorithmError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(AlgorithmError::ExecutionFailed("cold start".to_owned()));
            }
            Ok(())
        }
    }

    fn core() -> MeasurementCore {
        MeasurementCore::new(Arc::new(ReverseVecGenerator))
    }

    fn sized_config(size: usize, repetitions: usize) -> ExperimentConfig {
        ExperimentConfig {
            input_size: size,
            repetitions,
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn reduces_repetitions_into_statistics() {
        let stats = core()
            .run_single(
                &InsertionSort,
                &sized_config(200, 3),
                BatchId::generate(),
                &CancelToken::new(),
            )
            .unwrap()
            .unwrap();

        assert_eq!(stats.input_size, 200);
        assert_eq!(stats.algorithm, "Insertion Sort");
        assert!(stats.min_time_ms <= stats.avg_time_ms);
        assert!(stats.avg_time_ms <= stats.max_time_ms);
        assert!(stats.std_dev_time_ms >= 0.0);
    }

    #[test]
    fn std_dev_is_zero_for_a_single_repetition() {
        let stats = core()
            .run_single(
                &InsertionSort,
                &sized_config(100, 1),
                BatchId::generate(),
                &CancelToken::new(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(stats.std_dev_time_ms, 0.0);
    }

    #[test]
    fn cancelled_before_first_repetition_is_absent() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = core()
            .run_single(
                &InsertionSort,
                &sized_config(100, 5),
                BatchId::generate(),
                &cancel,
            )
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn warmup_failure_is_swallowed() {
        let algorithm = FlakyWarmup {
            calls: AtomicUsize::new(0),
        };
        let stats = core()
            .run_single(
                &algorithm,
                &sized_config(100, 2),
                BatchId::generate(),
                &CancelToken::new(),
            )
            .unwrap();
        assert!(stats.is_some());
        // warmup + 2 measured repetitions
        assert_eq!(algorithm.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn adversarial_input_replaces_the_standard_generator() {
        let algorithm = CapturingAlgorithm::new();
        let config = ExperimentConfig {
            adversarial: true,
            ..sized_config(10, 1)
        };
        core()
            .run_single(&algorithm, &config, BatchId::generate(), &CancelToken::new())
            .unwrap()
            .unwrap();

        let seen = algorithm.seen.lock().unwrap();
        // Warmup clone and measured clone both carry the adversarial shape.
        let expected: Vec<i64> = (0..10).collect();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|input| *input == expected));
    }

    #[test]
    fn tracer_hook_attaches_extended_metrics() {
        let config = ExperimentConfig {
            trace_operations: true,
            ..sized_config(50, 1)
        };
        let stats = core()
            .run_single(
                &InsertionSort,
                &config,
                BatchId::generate(),
                &CancelToken::new(),
            )
            .unwrap()
            .unwrap();
        let recorded: usize = stats.extended_metrics["tracer.operations"].parse().unwrap();
        assert!(recorded > 0);
        assert!(stats.extended_metrics.contains_key("tracer.breakdown"));
    }
}
