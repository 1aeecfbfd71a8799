//! Built-in pathological input generators
//!
//! Every generator is pure and deterministic: a fixed construction for a
//! given (size, seed), so tests can assert literal output. Each carries a
//! trigger explanation describing the complexity degradation it provokes.

use crate::algorithm::AlgorithmInput;

/// Proxy multiplier biasing integer keys toward shared hash buckets under
/// modulo-style hashing schemes.
const HASH_BUCKET_BIAS: i64 = 10_007;

/// Pluggable worst-case input strategy for one target algorithm.
pub trait AdversarialGenerator: Send + Sync {
    /// Identity of the algorithm this generator attacks.
    fn target(&self) -> &str;

    /// Human-readable account of the complexity trigger.
    fn trigger_explanation(&self) -> &str;

    /// Constructs the pathological input. Deterministic in (size, seed).
    fn generate(&self, size: usize, seed: u64) -> Box<dyn AlgorithmInput>;
}

/// Strictly increasing sequence: defeats naive endpoint-pivot selection,
/// degrading quicksort to O(N²).
pub struct QuicksortKillerGenerator;

impl AdversarialGenerator for QuicksortKillerGenerator {
    fn target(&self) -> &str {
        "Quick Sort"
    }

    fn trigger_explanation(&self) -> &str {
        "Strictly increasing array; first/last-element pivots recurse on \
         maximally unbalanced partitions, forcing O(N^2)."
    }

    fn generate(&self, size: usize, _seed: u64) -> Box<dyn AlgorithmInput> {
        let values: Vec<i64> = (0..size as i64).collect();
        Box::new(values)
    }
}

/// Keys spaced by a fixed proxy constant, biasing toward identical buckets
/// under the target's hashing scheme. A best-effort heuristic: collision
/// behavior depends entirely on the target's hash function (Rust's default
/// SipHash in particular is not defeated), not a guaranteed worst case.
pub struct HashCollisionGenerator;

impl AdversarialGenerator for HashCollisionGenerator {
    fn target(&self) -> &str {
        "Hash Table"
    }

    fn trigger_explanation(&self) -> &str {
        "Keys at a fixed stride of 10007 concentrate into shared buckets \
         under modulo-style hashing, degrading probes toward O(N) chains."
    }

    fn generate(&self, size: usize, _seed: u64) -> Box<dyn AlgorithmInput> {
        let keys: Vec<i64> = (0..size as i64).map(|i| i * HASH_BUCKET_BIAS).collect();
        Box::new(keys)
    }
}

/// Sequential insertion order degenerates an unbalanced binary search tree
/// into a linked list.
pub struct BstDegenerationGenerator;

impl AdversarialGenerator for BstDegenerationGenerator {
    fn target(&self) -> &str {
        "Binary Search Tree"
    }

    fn trigger_explanation(&self) -> &str {
        "Sorted sequential keys; every insertion descends the same spine, \
         collapsing the tree into a list with O(N^2) construction."
    }

    fn generate(&self, size: usize, _seed: u64) -> Box<dyn AlgorithmInput> {
        let keys: Vec<i64> = (0..size as i64).collect();
        Box::new(keys)
    }
}
