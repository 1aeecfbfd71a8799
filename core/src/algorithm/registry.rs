//! Explicit algorithm registry
//!
//! Maps algorithm identity to capability instance. Registration happens
//! explicitly at startup; there is no reflective discovery. The registry is
//! shared read-mostly across the front end and the engine, hence the
//! `parking_lot` lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::algorithm::traits::Algorithm;

/// Startup-time registry of benchmarkable algorithms.
#[derive(Default)]
pub struct AlgorithmRegistry {
    entries: RwLock<BTreeMap<String, Arc<dyn Algorithm>>>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability instance under its own identity. A later
    /// registration with the same identity replaces the earlier one.
    pub fn register(&self, algorithm: Arc<dyn Algorithm>) {
        let name = algorithm.name().to_owned();
        self.entries.write().insert(name, algorithm);
    }

    /// Looks up a capability instance by identity.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Algorithm>> {
        self.entries.read().get(name).cloned()
    }

    /// Distinct categories across all registered algorithms, sorted.
    pub fn categories(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut categories: Vec<String> =
            entries.values().map(|a| a.category().to_owned()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// All algorithms registered under `category`, in identity order.
    pub fn by_category(&self, category: &str) -> Vec<Arc<dyn Algorithm>> {
        self.entries
            .read()
            .values()
            .filter(|a| a.category() == category)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
