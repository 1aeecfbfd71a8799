//! Modeled energy and carbon accounting
//!
//! A pure proxy model over (elapsed time, allocated bytes, operation
//! count): fixed per-cycle, per-memory-access, and per-cache-miss energy
//! coefficients under an assumed clock rate, with carbon derived from a
//! fixed grid-intensity constant. Illustrative figures, not hardware
//! telemetry — no performance counters are read.

use serde::{Deserialize, Serialize};

/// Joules per CPU cycle.
const CPU_ENERGY_PER_CYCLE: f64 = 1.2e-9;
/// Joules per modeled memory access.
const MEMORY_ENERGY_PER_ACCESS: f64 = 5.0e-9;
/// Joules per modeled cache-miss penalty.
const CACHE_MISS_ENERGY: f64 = 2.0e-9;
/// Grams CO2e per joule, standard grid-mix proxy.
const CARBON_GRAMS_PER_JOULE: f64 = 1.3e-4;
/// Assumed clock rate for cycle modeling.
const ASSUMED_CLOCK_HZ: f64 = 3.5e9;
/// Modeled miss rate over memory accesses.
const MODELED_MISS_RATE: f64 = 0.05;

/// Modeled energy expenditure for one measured run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    pub joules: f64,
    pub carbon_grams: f64,
    pub modeled_cpu_cycles: u64,
    pub modeled_memory_accesses: u64,
    pub modeled_cache_misses: u64,
}

/// Estimates energy from elapsed wall-clock time, allocated bytes, and the
/// traced operation count (0 when tracing was disabled; cycle-derived
/// accesses substitute).
pub fn estimate(elapsed_ms: f64, allocated_bytes: u64, operation_count: u64) -> EnergyEstimate {
    let modeled_cpu_cycles = ((elapsed_ms / 1e3) * ASSUMED_CLOCK_HZ) as u64;

    // Traced operations proxy memory traffic when available; otherwise one
    // access per ten cycles.
    let modeled_memory_accesses = allocated_bytes / 8
        + if operation_count > 0 {
            operation_count * 2
        } else {
            modeled_cpu_cycles / 10
        };
    let modeled_cache_misses = (modeled_memory_accesses as f64 * MODELED_MISS_RATE) as u64;

    let joules = CPU_ENERGY_PER_CYCLE * modeled_cpu_cycles as f64
        + MEMORY_ENERGY_PER_ACCESS * modeled_memory_accesses as f64
        + CACHE_MISS_ENERGY * modeled_cache_misses as f64;

    EnergyEstimate {
        joules,
        carbon_grams: joules * CARBON_GRAMS_PER_JOULE,
        modeled_cpu_cycles,
        modeled_memory_accesses,
        modeled_cache_misses,
    }
}
