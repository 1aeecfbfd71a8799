//! METRON Core: Empirical Algorithm Performance Observatory
//!
//! This crate implements the measurement-and-analysis engine at the heart of
//! the METRON observatory: an experiment orchestrator sweeping input sizes
//! over pluggable algorithms, a statistically summarized measurement core,
//! barrier-coordinated concurrency profilers, adversarial worst-case input
//! synthesis, zero-overhead micro-operation instrumentation, and a suite of
//! derived statistical analyses (asymptotic complexity fitting, phase
//! transition detection, modeled energy accounting, allocation topology).
//!
//! The engine is deliberately agnostic of the algorithm catalog, the input
//! generation conventions, and any presentation or storage layer: those
//! collaborators are consumed through the capability traits in
//! [`algorithm`] and [`persistence`].

pub mod algorithm;
pub mod measurement;
pub mod concurrency;
pub mod adversarial;
pub mod instrumentation;
pub mod analysis;
pub mod persistence;

pub use self::algorithm::{Algorithm, AlgorithmError, AlgorithmInput, AlgorithmRegistry, InputGenerator};
pub use self::instrumentation::Probe;
pub use self::measurement::{
    CancelToken, ExperimentConfig, ExperimentOrchestrator, MeasurementCore, ProgressSink,
    RunStatistics,
};
