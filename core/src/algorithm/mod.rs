//! METRON Algorithm Capability Framework
//! Capability contracts for benchmarked algorithms and their collaborators
//! Copyright (c) 2026 Metron Contributors

pub mod input;
pub mod registry;
pub mod traits;

pub use self::input::{AlgorithmInput, InputGenerator};
pub use self::registry::AlgorithmRegistry;
pub use self::traits::{Algorithm, AlgorithmError};
