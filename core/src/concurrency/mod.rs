//! METRON Concurrency Profilers
//! Barrier-coordinated thread-scaling analysis and synchronized races
//! Copyright (c) 2026 Metron Contributors

pub mod race;
pub mod scaling;

pub use self::race::{run_race, RaceResult};
pub use self::scaling::{analyze_scaling, ScalingPoint};
