//! In-memory word storage, the default backend.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{DEFAULT_PROBABILITY, StorageProvider, WordFrequency, WordIter, WordStorage};

/// Configuration for in-memory storages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemoryStorageConfig {
    /// Number of distinct words each new table is pre-sized for.
    pub initial_capacity: usize,
}

#[derive(Debug, Default)]
struct FrequencyTable {
    counts: AHashMap<String, u64>,
    total: u64,
}

/// A hash-map backed frequency table.
///
/// `counts` and `total` live behind one lock, so every `store` updates both
/// atomically and readers never observe a total that disagrees with the counts.
#[derive(Debug)]
pub struct MemoryWordStorage {
    table: RwLock<FrequencyTable>,
    default_probability: f64,
}

impl MemoryWordStorage {
    /// Create a new empty storage.
    pub fn new(config: MemoryStorageConfig, default_probability: f64) -> Self {
        MemoryWordStorage {
            table: RwLock::new(FrequencyTable {
                counts: AHashMap::with_capacity(config.initial_capacity),
                total: 0,
            }),
            default_probability,
        }
    }

    /// Copy the current table into a list sorted by word.
    pub fn snapshot(&self) -> Vec<WordFrequency> {
        let table = self.table.read();
        let mut entries: Vec<WordFrequency> = table
            .counts
            .iter()
            .map(|(word, frequency)| WordFrequency::new(word.clone(), *frequency))
            .collect();
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        entries
    }
}

impl Default for MemoryWordStorage {
    fn default() -> Self {
        Self::new(MemoryStorageConfig::default(), DEFAULT_PROBABILITY)
    }
}

impl WordStorage for MemoryWordStorage {
    fn get(&self, word: &str) -> Result<Option<u64>> {
        Ok(self.table.read().counts.get(word).copied())
    }

    fn store(&self, word: &str) -> Result<()> {
        let mut table = self.table.write();
        match table.counts.get_mut(word) {
            Some(frequency) => *frequency += 1,
            None => {
                table.counts.insert(word.to_string(), 1);
            }
        }
        table.total += 1;
        Ok(())
    }

    fn total(&self) -> u64 {
        self.table.read().total
    }

    fn vocabulary_size(&self) -> usize {
        self.table.read().counts.len()
    }

    fn iter(&self) -> Result<WordIter> {
        Ok(Box::new(self.snapshot().into_iter()))
    }

    fn default_probability(&self) -> f64 {
        self.default_probability
    }

    fn word_probability(&self, word: &str) -> Result<f64> {
        // Read frequency and total under the same guard.
        let table = self.table.read();
        match table.counts.get(word) {
            Some(&frequency) if table.total > 0 => Ok(frequency as f64 / table.total as f64),
            _ => Ok(self.default_probability),
        }
    }
}

/// Provider handing out [`MemoryWordStorage`] instances.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    config: MemoryStorageConfig,
}

impl MemoryStorageProvider {
    /// Create a new provider.
    pub fn new(config: MemoryStorageConfig) -> Self {
        MemoryStorageProvider { config }
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn create_storage(&self, default_probability: f64) -> Arc<dyn WordStorage> {
        Arc::new(MemoryWordStorage::new(self.config.clone(), default_probability))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
