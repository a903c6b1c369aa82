//! Word-frequency storage abstraction for naivebayes.
//!
//! Every class known to a classifier owns one [`WordStorage`]: a frequency
//! table from token to occurrence count plus a running total of all
//! occurrences. The scoring engine only talks to storages through this trait,
//! so backends can be swapped without touching the classifier.
//!
//! # Architecture
//!
//! - **WordStorage trait**: per-class frequency table (get, store, total, iterate)
//! - **StorageProvider trait**: creates a fresh, empty storage for a new class
//! - **StorageConfig enum**: type-safe configuration for supported backends
//! - **StorageFactory**: helper for turning a `StorageConfig` into a provider
//!
//! # Smoothing
//!
//! [`WordStorage::word_probability`] returns `count / total` for words that
//! were stored and a fixed default probability (`1e-11` unless configured
//! otherwise) for words that never were. The default is applied only to
//! unseen words: seen words are not adjusted, so the probabilities of a class
//! do not sum to one once unseen words are involved. This is not Laplace
//! smoothing, which would add a pseudo-count to every vocabulary entry.
//!
//! # Example
//!
//! ```
//! use naivebayes::storage::{StorageConfig, StorageFactory, DEFAULT_PROBABILITY};
//! use naivebayes::storage::memory::MemoryStorageConfig;
//!
//! # fn main() -> naivebayes::error::Result<()> {
//! let provider = StorageFactory::create(&StorageConfig::Memory(MemoryStorageConfig::default()));
//! let storage = provider.create_storage(DEFAULT_PROBABILITY);
//!
//! storage.store("rust")?;
//! storage.store("rust")?;
//! storage.store("go")?;
//!
//! assert_eq!(storage.get("rust")?, Some(2));
//! assert_eq!(storage.total(), 3);
//! assert_eq!(storage.word_probability("missing")?, DEFAULT_PROBABILITY);
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{NaiveBayesError, Result};

pub mod memory;

/// Probability assigned to words a class has never seen.
pub const DEFAULT_PROBABILITY: f64 = 1e-11;

/// A single (word, frequency) entry of a class's frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordFrequency {
    /// The stored token.
    pub word: String,

    /// How many times the token was stored for the class.
    pub frequency: u64,
}

impl WordFrequency {
    /// Create a new entry.
    pub fn new<S: Into<String>>(word: S, frequency: u64) -> Self {
        WordFrequency {
            word: word.into(),
            frequency,
        }
    }
}

/// Iterator over the entries of a frequency table.
pub type WordIter = Box<dyn Iterator<Item = WordFrequency> + Send>;

/// A per-class word-frequency table.
///
/// Implementations must keep `total() == sum of all frequencies` and must make
/// [`store`](WordStorage::store) atomic with respect to concurrent callers.
pub trait WordStorage: Send + Sync + Debug {
    /// Get the frequency of a word.
    ///
    /// Returns `Ok(None)` when the word was never stored for this class.
    fn get(&self, word: &str) -> Result<Option<u64>>;

    /// Record one occurrence of a word.
    ///
    /// Increments both the word's frequency and the running total by exactly one.
    fn store(&self, word: &str) -> Result<()>;

    /// Sum of all stored occurrences.
    fn total(&self) -> u64;

    /// Number of distinct words stored.
    fn vocabulary_size(&self) -> usize;

    /// Iterate over all (word, frequency) entries.
    ///
    /// The iterator reads a snapshot taken when `iter` is called. Writes that
    /// happen while the snapshot is taken may or may not be included; writes
    /// after that are never observed. Call `iter` again to restart.
    fn iter(&self) -> Result<WordIter>;

    /// Probability returned for words this storage has never seen.
    fn default_probability(&self) -> f64;

    /// Estimate `P(word | class)`.
    ///
    /// Returns `frequency / total` for a seen word, and
    /// [`default_probability`](WordStorage::default_probability) otherwise.
    fn word_probability(&self, word: &str) -> Result<f64> {
        match self.get(word)? {
            Some(frequency) if frequency > 0 => {
                let total = self.total();
                if total == 0 {
                    return Err(NaiveBayesError::storage(format!(
                        "word '{word}' has frequency {frequency} but storage total is 0"
                    )));
                }
                Ok(frequency as f64 / total as f64)
            }
            _ => Ok(self.default_probability()),
        }
    }
}

/// Creates empty storages for newly referenced classes.
///
/// This is the seam a classifier uses to stay independent of any concrete
/// backend.
pub trait StorageProvider: Send + Sync + Debug {
    /// Create a fresh, empty storage.
    fn create_storage(&self, default_probability: f64) -> Arc<dyn WordStorage>;

    /// Get the name of this provider (for debugging and logging).
    fn name(&self) -> &'static str;
}

/// Storage configuration enum that specifies which backend to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Memory-based storage configuration
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// A factory for creating storage providers.
///
/// This factory creates the provider matching the given configuration.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage provider for the given configuration.
    pub fn create(config: &StorageConfig) -> Arc<dyn StorageProvider> {
        match config {
            StorageConfig::Memory(mem_config) => {
                Arc::new(memory::MemoryStorageProvider::new(mem_config.clone()))
            }
        }
    }
}
