//! Algorithmic phase transition detection
//!
//! Sweeps a named configuration parameter over [start, end] in equal
//! increments, regenerating the input and timing one execution per point,
//! then scans the interior points for the maximum discrete second
//! derivative |slope(i+1) − slope(i−1)| of the latency curve. The point of
//! maximum gradient discontinuity is reported as the critical parameter.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, InputGenerator};
use crate::analysis::AnalysisError;
use crate::instrumentation::Probe;
use crate::measurement::alloc;
use crate::measurement::config::{ExperimentConfig, GraphDensity, SweepParameter};

/// One sweep point: parameter value and its measured latency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSweepPoint {
    pub parameter: f64,
    pub elapsed_ms: f64,
}

/// Outcome of one phase-transition sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransitionReport {
    /// Parameter value at the maximum gradient discontinuity.
    pub critical_parameter: f64,
    /// Magnitude of that discontinuity.
    pub max_slope_delta: f64,
    /// The full latency curve, in parameter order.
    pub curve: Vec<PhaseSweepPoint>,
}

/// Sweeps a configuration axis and locates latency discontinuities.
pub struct PhaseTransitionDetector {
    generator: Arc<dyn InputGenerator>,
}

impl PhaseTransitionDetector {
    pub fn new(generator: Arc<dyn InputGenerator>) -> Self {
        Self { generator }
    }

    /// Runs the sweep described by `base.phase_sweep`.
    pub fn detect(
        &self,
        algorithm: &dyn Algorithm,
        base: &ExperimentConfig,
    ) -> Result<PhaseTransitionReport, AnalysisError> {
        let sweep = &base.phase_sweep;
        if sweep.steps == 0 || sweep.end <= sweep.start {
            return Err(AnalysisError::DegenerateSweep);
        }
        let increment = (sweep.end - sweep.start) / sweep.steps as f64;

        let mut curve = Vec::with_capacity(sweep.steps + 1);
        for index in 0..=sweep.steps {
            let parameter = sweep.start + increment * index as f64;
            alloc::quiesce();

            let variant = apply_parameter(base, sweep.parameter, parameter);
            let mut input =
                self.generator
                    .generate(&variant, algorithm.category(), algorithm.name())?;

            let mut probe = Probe::disabled();
            let started = Instant::now();
            algorithm.execute(&mut *input, &mut probe)?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;

            curve.push(PhaseSweepPoint {
                parameter,
                elapsed_ms,
            });
        }

        let mut critical_parameter = sweep.start;
        let mut max_slope_delta = 0.0;
        for i in 1..curve.len() - 1 {
            let previous_slope = (curve[i].elapsed_ms - curve[i - 1].elapsed_ms) / increment;
            let next_slope = (curve[i + 1].elapsed_ms - curve[i].elapsed_ms) / increment;
            let slope_delta = (next_slope - previous_slope).abs();
            if slope_delta > max_slope_delta {
                max_slope_delta = slope_delta;
                critical_parameter = curve[i].parameter;
            }
        }

        log::debug!(
            "{}: critical parameter {critical_parameter:.3}, slope delta {max_slope_delta:.3}",
            algorithm.name()
        );
        Ok(PhaseTransitionReport {
            critical_parameter,
            max_slope_delta,
            curve,
        })
    }
}

/// Maps the abstract sweep parameter onto the concrete configuration axis
/// the input-generation collaborator interprets.
fn apply_parameter(
    base: &ExperimentConfig,
    parameter: SweepParameter,
    value: f64,
) -> ExperimentConfig {
    let mut variant = base.clone();
    match parameter {
        SweepParameter::Density => {
            variant.graph_density = if value > 0.5 {
                GraphDensity::Dense
            } else if value < 0.2 {
                GraphDensity::Sparse
            } else {
                GraphDensity::Medium
            };
        }
        SweepParameter::KeySize => {
            variant.key_size = value.max(0.0) as usize;
        }
    }
    variant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{AlgorithmError, AlgorithmInput};
    use crate::measurement::config::PhaseSweep;

    /// Input size jumps two orders of magnitude once key_size crosses 600.
    struct ThresholdGenerator;

    impl InputGenerator for ThresholdGenerator {
        fn generate(
            &self,
            config: &ExperimentConfig,
            _category: &str,
            _identity: &str,
        ) -> Result<Box<dyn AlgorithmInput>, AlgorithmError> {
            let size = if config.key_size > 600 { 200_000 } else { 200 };
            let values: Vec<i64> = (0..size as i64).rev().collect();
            Ok(Box::new(values))
        }
    }

    struct SortWork;

    impl Algorithm for SortWork {
        fn name(&self) -> &str {
            "Sort Work"
        }

        fn category(&self) -> &str {
            "Indexing"
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
                    algorithm: "Sort Work".to_owned(),
                    expected: "Vec<i64>",
                })?;
            for _ in 0..4 {
                values.reverse();
                values.sort_unstable();
            }
            Ok(())
        }
    }

    fn key_size_sweep(start: f64, end: f64, steps: usize) -> ExperimentConfig {
        ExperimentConfig {
            phase_sweep: PhaseSweep {
                parameter: SweepParameter::KeySize,
                start,
                end,
                steps,
            },
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn sweep_produces_one_point_per_increment() {
        let detector = PhaseTransitionDetector::new(Arc::new(ThresholdGenerator));
        let report = detector
            .detect(&SortWork, &key_size_sweep(100.0, 1000.0, 9))
            .unwrap();
        assert_eq!(report.curve.len(), 10);
        assert!((report.curve[0].parameter - 100.0).abs() < 1e-9);
        assert!((report.curve[9].parameter - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn discontinuity_is_located_near_the_threshold() {
        let detector = PhaseTransitionDetector::new(Arc::new(ThresholdGenerator));
        let report = detector
            .detect(&SortWork, &key_size_sweep(100.0, 1000.0, 9))
            .unwrap();
        assert!(report.max_slope_delta > 0.0);
        // The workload jumps between key sizes 600 and 700.
        assert!(
            report.critical_parameter >= 500.0 && report.critical_parameter <= 800.0,
            "critical parameter {} outside the transition window",
            report.critical_parameter
        );
    }

    #[test]
    fn degenerate_sweeps_are_rejected() {
        let detector = PhaseTransitionDetector::new(Arc::new(ThresholdGenerator));
        assert!(matches!(
            detector.detect(&SortWork, &key_size_sweep(100.0, 1000.0, 0)),
            Err(AnalysisError::DegenerateSweep)
        ));
        assert!(matches!(
            detector.detect(&SortWork, &key_size_sweep(1000.0, 100.0, 5)),
            Err(AnalysisError::DegenerateSweep)
        ));
    }

    #[test]
    fn density_axis_maps_onto_buckets() {
        let base = ExperimentConfig::default();
        assert_eq!(
            apply_parameter(&base, SweepParameter::Density, 0.1).graph_density,
            GraphDensity::Sparse
        );
        assert_eq!(
            apply_parameter(&base, SweepParameter::Density, 0.35).graph_density,
            GraphDensity::Medium
        );
        assert_eq!(
            apply_parameter(&base, SweepParameter::Density, 0.9).graph_density,
            GraphDensity::Dense
        );
    }
}
