use std::collections::HashMap;
use std::sync::Arc;

use super::processing::processors::{
    CategoryProcessor, GenericProcessor, LabResultsProcessor, MedicationsProcessor,
    PatientProcessor, VitalsProcessor,
};
use crate::constants;

/// Registry for category-specific processors
///
/// Keyed by the raw category label, so substitute or additional processors
/// can be registered next to the built-in ones.
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn CategoryProcessor>>,
}

impl ProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Create a registry with every built-in category processor
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(constants::PATIENTS, Arc::new(PatientProcessor::default()));
        registry.register(constants::VITALS, Arc::new(VitalsProcessor::default()));
        registry.register(constants::MEDICATIONS, Arc::new(MedicationsProcessor::default()));
        registry.register(constants::LAB_RESULTS, Arc::new(LabResultsProcessor::default()));
        registry.register(constants::GENERIC, Arc::new(GenericProcessor::default()));
        registry
    }

    /// Register a processor for a category, replacing any existing one
    pub fn register(&mut self, category: impl Into<String>, processor: Arc<dyn CategoryProcessor>) {
        self.processors.insert(category.into(), processor);
    }

    /// Get the processor for a category
    pub fn get(&self, category: &str) -> Option<Arc<dyn CategoryProcessor>> {
        self.processors.get(category).cloned()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.processors.contains_key(category)
    }

    /// List all registered category labels, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.processors.keys().map(|k| k.as_str()).collect();
        labels.sort_unstable();
        labels
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
