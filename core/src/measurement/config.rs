//! Experiment configuration
//!
//! An [`ExperimentConfig`] is the immutable-per-run snapshot of everything
//! a sweep needs: size bounds, repetition count, and the category-specific
//! knobs the input-generation collaborator interprets. The orchestrator
//! derives one frozen variant per swept size via [`ExperimentConfig::for_size`];
//! no component mutates a shared configuration context.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::instrumentation::cache::DEFAULT_CACHE_LINE_BYTES;

/// Configuration validation failures, raised before any execution begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum input size {min} exceeds maximum {max}")]
    InvalidSizeRange { min: usize, max: usize },

    #[error("repetition count must be at least 1")]
    NoRepetitions,
}

/// Value distribution applied by the input-generation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distribution {
    Random,
    Sorted,
    ReverseSorted,
    NearlySorted,
}

/// Graph density buckets understood by graph-category generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphDensity {
    Sparse,
    Medium,
    Dense,
}

/// The concrete configuration axis a phase-transition sweep maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepParameter {
    /// Mapped onto [`ExperimentConfig::graph_density`] buckets.
    Density,
    /// Mapped onto [`ExperimentConfig::key_size`] directly.
    KeySize,
}

/// Bounds and resolution of a phase-transition parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSweep {
    pub parameter: SweepParameter,
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

impl Default for PhaseSweep {
    fn default() -> Self {
        Self {
            parameter: SweepParameter::Density,
            start: 0.1,
            end: 1.0,
            steps: 10,
        }
    }
}

/// Immutable-per-run experiment parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    // Sweep bounds
    pub min_size: usize,
    pub max_size: usize,
    pub step: usize,

    /// The size a derived per-size variant is frozen at.
    pub input_size: usize,
    pub repetitions: usize,

    // Category knobs, interpreted by the input-generation collaborator
    pub distribution: Distribution,
    pub graph_density: GraphDensity,
    pub directed: bool,
    pub weighted: bool,
    pub key_size: usize,
    pub query_count: usize,
    pub feature_dimension: usize,
    pub epochs: usize,

    // Adversarial synthesis
    pub adversarial: bool,
    pub adversarial_seed: u64,

    // Instrumentation toggles
    pub trace_operations: bool,
    pub analyze_cache_locality: bool,
    pub cache_line_bytes: u64,
    pub estimate_energy: bool,
    pub profile_allocations: bool,

    // Derived analyses
    pub phase_sweep: PhaseSweep,
    pub warmup_profile_iterations: usize,
    pub max_threads: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_size: 100,
            max_size: 1000,
            step: 100,
            input_size: 1000,
            repetitions: 5,
            distribution: Distribution::Random,
            graph_density: GraphDensity::Sparse,
            directed: false,
            weighted: false,
            key_size: 256,
            query_count: 100,
            feature_dimension: 10,
            epochs: 10,
            adversarial: false,
            adversarial_seed: 42,
            trace_operations: false,
            analyze_cache_locality: false,
            cache_line_bytes: DEFAULT_CACHE_LINE_BYTES,
            estimate_energy: false,
            profile_allocations: false,
            phase_sweep: PhaseSweep::default(),
            warmup_profile_iterations: 100,
            max_threads: num_cpus::get(),
        }
    }
}

impl ExperimentConfig {
    /// Validates sweep bounds and returns a normalized copy: a non-positive
    /// step is coerced to 1. `min > max` is a configuration error, distinct
    /// from any runtime failure.
    pub fn validated(&self) -> Result<ExperimentConfig, ConfigError> {
        if self.min_size > self.max_size {
            return Err(ConfigError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.repetitions == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        let mut normalized = self.clone();
        if normalized.step == 0 {
            normalized.step = 1;
        }
        Ok(normalized)
    }

    /// Derives the frozen per-size variant for one swept size.
    pub fn for_size(&self, size: usize) -> ExperimentConfig {
        let mut derived = self.clone();
        derived.input_size = size;
        derived
    }

    /// Number of sizes a validated sweep visits: `min, min+step, ..., <= max`.
    pub fn sweep_len(&self) -> usize {
        (self.max_size - self.min_size) / self.step + 1
    }
}
