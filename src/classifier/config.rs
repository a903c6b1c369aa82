//! Classifier configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NaiveBayesError, Result};
use crate::storage::{DEFAULT_PROBABILITY, StorageConfig};

/// Default capacity of the channel behind a stream trainer.
pub const DEFAULT_STREAM_BUFFER: usize = 1024;

/// Configuration for a [`NaiveBayesClassifier`](super::NaiveBayesClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Probability used for words a class has never seen.
    pub default_probability: f64,
    /// Backend used for per-class word storages.
    pub storage: StorageConfig,
    /// Score classes in parallel.
    pub parallel_scoring: bool,
    /// Capacity of the stream trainer channel (0 = unbounded).
    pub stream_buffer: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            default_probability: DEFAULT_PROBABILITY,
            storage: StorageConfig::default(),
            parallel_scoring: false,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl ClassifierConfig {
    /// Set the smoothing probability for unseen words.
    pub fn with_default_probability(mut self, probability: f64) -> Self {
        self.default_probability = probability;
        self
    }

    /// Enable or disable parallel scoring.
    pub fn with_parallel_scoring(mut self, enabled: bool) -> Self {
        self.parallel_scoring = enabled;
        self
    }

    /// Set the stream trainer channel capacity.
    pub fn with_stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = capacity;
        self
    }

    /// Set the storage backend.
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        let p = self.default_probability;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(NaiveBayesError::invalid_config(format!(
                "default_probability must be in (0, 1], got {p}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ClassifierConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
