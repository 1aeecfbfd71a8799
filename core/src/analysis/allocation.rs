//! Allocation topology profiling
//!
//! Snapshots the metering allocator's thread tallies immediately before
//! and after one `execute` call and reports the deltas with a weighted
//! pressure score. This is the degraded-mode rendition of a generational
//! GC profiler: the runtime exposes no collection counters, so the report
//! carries allocator-level figures only, and the pressure score weights
//! allocation events against resident megabytes instead of collection
//! generations.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, AlgorithmInput};
use crate::instrumentation::Probe;
use crate::measurement::alloc;
use crate::measurement::core::MeasurementError;

const BYTES_PER_MEBIBYTE: f64 = 1024.0 * 1024.0;

/// Allocation behavior of one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTopology {
    pub allocated_bytes: u64,
    pub allocation_count: u64,
    pub allocation_rate_bytes_per_ms: f64,
    /// Allocation events plus allocated mebibytes; higher means more
    /// allocator churn per execution.
    pub pressure_score: f64,
}

/// Profiles one execution of `algorithm` over a clone of `input`.
pub fn profile(
    algorithm: &dyn Algorithm,
    input: &dyn AlgorithmInput,
) -> Result<AllocationTopology, MeasurementError> {
    let mut cloned = input.clone_boxed();
    let mut probe = Probe::disabled();
    alloc::quiesce();

    let bytes_before = alloc::thread_allocated_bytes();
    let count_before = alloc::thread_allocation_count();
    let started = Instant::now();
    algorithm.execute(&mut *cloned, &mut probe)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
    let allocated_bytes = alloc::thread_allocated_bytes().saturating_sub(bytes_before);
    let allocation_count = alloc::thread_allocation_count().saturating_sub(count_before);

    let allocation_rate_bytes_per_ms = if elapsed_ms > 0.0 {
        allocated_bytes as f64 / elapsed_ms
    } else {
        0.0
    };
    let pressure_score =
        allocation_count as f64 + allocated_bytes as f64 / BYTES_PER_MEBIBYTE;

    Ok(AllocationTopology {
        allocated_bytes,
        allocation_count,
        allocation_rate_bytes_per_ms,
        pressure_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmError;

    /// Allocates one scratch buffer per element.
    struct Churner;

    impl Algorithm for Churner {
        fn name(&self) -> &str {
            "Churner"
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
                    algorithm: "Churner".to_owned(),
                    expected: "Vec<i64>",
                })?;
            let mut scratch: Vec<Vec<u8>> = Vec::with_capacity(values.len());
            for &v in values.iter() {
                scratch.push(vec![0u8; 256 + (v as usize & 0xff)]);
            }
            values.reverse();
            drop(scratch);
            Ok(())
        }
    }

    /// Touches the input without heap allocation.
    struct InPlace;

    impl Algorithm for InPlace {
        fn name(&self) -> &str {
            "In Place"
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
                    algorithm: "In Place".to_owned(),
                    expected: "Vec<i64>",
                })?;
            values.sort_unstable();
            Ok(())
        }
    }

    #[test]
    fn allocating_workload_registers_churn() {
        let input: Vec<i64> = (0..512).collect();
        let topology = profile(&Churner, &input).unwrap();
        assert!(topology.allocated_bytes >= 512 * 256);
        assert!(topology.allocation_count >= 512);
        assert!(topology.pressure_score > 0.0);
    }

    #[test]
    fn in_place_workload_registers_little() {
        let input: Vec<i64> = (0..512).rev().collect();
        let churn = profile(&Churner, &input).unwrap();
        let quiet = profile(&InPlace, &input).unwrap();
        assert!(quiet.allocated_bytes < churn.allocated_bytes);
        assert!(quiet.pressure_score < churn.pressure_score);
    }
}
