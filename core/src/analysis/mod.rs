//! METRON Statistical Analysis Suite
//! Derived reports over completed measurement series: complexity fitting,
//! phase transitions, modeled energy, allocation topology, warmup curves
//! Copyright (c) 2026 Metron Contributors

pub mod allocation;
pub mod complexity;
pub mod energy;
pub mod phase;
pub mod warmup;

pub use self::allocation::AllocationTopology;
pub use self::complexity::{verify_bounds, ComplexityFit};
pub use self::energy::{estimate, EnergyEstimate};
pub use self::phase::{PhaseSweepPoint, PhaseTransitionDetector, PhaseTransitionReport};
pub use self::warmup::{profile_warmup, WarmupIteration};

use thiserror::Error;

use crate::algorithm::AlgorithmError;

/// Input-validation and execution failures raised synchronously by the
/// analysis calls. Never silently defaulted.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("complexity fitting requires at least 3 paired points, got {0}")]
    InsufficientData(usize),

    #[error("size and time series lengths differ: {sizes} sizes, {times} times")]
    LengthMismatch { sizes: usize, times: usize },

    #[error("phase sweep requires end > start and at least one step")]
    DegenerateSweep,

    #[error(transparent)]
    Execution(#[from] AlgorithmError),
}
