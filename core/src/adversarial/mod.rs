//! METRON Adversarial Input Synthesizer
//! Deterministic worst-case input construction, registry-dispatched by target identity
//! Copyright (c) 2026 Metron Contributors

pub mod generators;

pub use self::generators::{
    AdversarialGenerator, BstDegenerationGenerator, HashCollisionGenerator,
    QuicksortKillerGenerator,
};

use std::collections::HashMap;
use std::sync::Arc;

use crate::algorithm::AlgorithmInput;

/// Registry of adversarial generators, keyed by target algorithm identity.
#[derive(Default)]
pub struct AdversarialEngine {
    generators: HashMap<String, Arc<dyn AdversarialGenerator>>,
}

impl AdversarialEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine pre-loaded with the built-in pathological generators.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(QuicksortKillerGenerator));
        engine.register(Arc::new(HashCollisionGenerator));
        engine.register(Arc::new(BstDegenerationGenerator));
        engine
    }

    /// Registers a generator under its target identity, replacing any
    /// earlier registration for the same target.
    pub fn register(&mut self, generator: Arc<dyn AdversarialGenerator>) {
        self.generators
            .insert(generator.target().to_owned(), generator);
    }

    pub fn has_generator(&self, target: &str) -> bool {
        self.generators.contains_key(target)
    }

    /// Synthesizes a pathological input for `target`, or `None` when no
    /// generator is registered for that identity.
    pub fn generate(
        &self,
        target: &str,
        size: usize,
        seed: u64,
    ) -> Option<Box<dyn AlgorithmInput>> {
        self.generators
            .get(target)
            .map(|generator| generator.generate(size, seed))
    }
}
