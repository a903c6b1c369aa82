//! Multinomial Naive Bayes classifier.
//!
//! [`NaiveBayesClassifier`] ties together the pieces of the engine:
//!
//! - [`registry::ClassifierRegistry`] owns one word storage per class label
//! - [`trainer::Trainer`] feeds tokens into those storages
//! - [`scorer::Scorer`] turns the stored frequencies into per-class scores
//!
//! Training and scoring both take `&self`, so a classifier can be shared
//! between threads behind an `Arc`. Scoring does not coordinate with
//! in-flight training: callers that need to score exactly what has been
//! trained must finish training first.
//!
//! # Examples
//!
//! ```
//! use naivebayes::classifier::NaiveBayesClassifier;
//!
//! # fn main() -> naivebayes::error::Result<()> {
//! let classifier = NaiveBayesClassifier::new();
//! classifier.add_words("good", &["楽", "簡単", "高給"])?;
//! classifier.add_words("bad", &["きつい", "汚い", "危険"])?;
//!
//! let result = classifier.log_scores(&["楽", "簡単", "汚い"])?;
//! assert_eq!(result.max_classes, vec!["good"]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;
use crate::storage::{StorageFactory, StorageProvider, WordFrequency, WordStorage};

pub mod config;
pub mod registry;
pub mod result;
pub mod scorer;
pub mod trainer;

pub use config::ClassifierConfig;
pub use result::ClassificationResult;
pub use scorer::ScoringStrategy;
pub use trainer::{CancellationToken, StreamTrainer};

use registry::ClassifierRegistry;
use scorer::Scorer;
use trainer::Trainer;

/// A multinomial Naive Bayes classifier over opaque string tokens.
///
/// Clones share the same class storages.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    config: ClassifierConfig,
    registry: Arc<ClassifierRegistry>,
    trainer: Trainer,
    scorer: Scorer,
}

impl NaiveBayesClassifier {
    /// Create a classifier with the default configuration.
    pub fn new() -> Self {
        let config = ClassifierConfig::default();
        let provider = StorageFactory::create(&config.storage);
        Self::build(config, provider)
    }

    /// Create a classifier from a validated configuration.
    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let provider = StorageFactory::create(&config.storage);
        Ok(Self::build(config, provider))
    }

    /// Create a classifier whose storages come from a custom provider.
    ///
    /// `config.storage` is ignored.
    pub fn with_storage_provider(
        config: ClassifierConfig,
        provider: Arc<dyn StorageProvider>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, provider))
    }

    fn build(config: ClassifierConfig, provider: Arc<dyn StorageProvider>) -> Self {
        let registry = Arc::new(ClassifierRegistry::new(provider, config.default_probability));
        NaiveBayesClassifier {
            trainer: Trainer::new(Arc::clone(&registry)),
            scorer: Scorer::new(Arc::clone(&registry), config.parallel_scoring),
            registry,
            config,
        }
    }

    /// The configuration this classifier was built with.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Get the storage of a class, creating an empty one if needed.
    pub fn storage_for(&self, class: &str) -> Arc<dyn WordStorage> {
        self.registry.storage_for(class)
    }

    /// All known class labels, sorted.
    pub fn classes(&self) -> Vec<String> {
        self.registry.classes()
    }

    /// Train `class` with a batch of words.
    pub fn add_words<S: AsRef<str>>(&self, class: &str, words: &[S]) -> Result<u64> {
        self.trainer.add_words(class, words)
    }

    /// Train `class` from a channel until every sender is dropped.
    pub fn add_from_stream(&self, class: &str, receiver: Receiver<String>) -> Result<u64> {
        self.trainer.add_from_stream(class, receiver)
    }

    /// Train `class` from a channel until it closes or `cancel` fires.
    pub fn add_from_stream_with_cancel(
        &self,
        class: &str,
        receiver: Receiver<String>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        self.trainer.add_from_stream_with_cancel(class, receiver, cancel)
    }

    /// Train `class` from a tokio channel until it closes.
    pub async fn add_from_async_stream(
        &self,
        class: &str,
        receiver: tokio::sync::mpsc::Receiver<String>,
    ) -> Result<u64> {
        self.trainer.add_from_async_stream(class, receiver).await
    }

    /// Spawn a consumer thread training `class`, buffered per the configuration.
    pub fn stream_trainer(&self, class: &str) -> Result<StreamTrainer> {
        self.trainer.spawn_stream(class, self.config.stream_buffer)
    }

    /// Tokenize `text` and train `class` with the tokens.
    pub fn add_text(&self, class: &str, text: &str, tokenizer: &dyn Tokenizer) -> Result<u64> {
        let tokens = tokenizer.tokenize(text)?;
        self.trainer.add_words(class, &tokens)
    }

    /// Prior probability of every class.
    pub fn prior_probabilities(&self) -> Result<BTreeMap<String, f64>> {
        self.scorer.prior_probabilities()
    }

    /// Log-domain scores for `document`.
    pub fn log_scores<S: AsRef<str> + Sync>(&self, document: &[S]) -> Result<ClassificationResult> {
        self.scorer.log_scores(document)
    }

    /// Raw probability scores for `document`. Underflow-prone.
    pub fn probabilities<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
    ) -> Result<ClassificationResult> {
        self.scorer.probabilities(document)
    }

    /// Raw probability scores, checked against the log-domain winners.
    pub fn safe_probabilities<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
    ) -> Result<ClassificationResult> {
        self.scorer.safe_probabilities(document)
    }

    /// Score `document` with the given strategy.
    pub fn classify<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
        strategy: ScoringStrategy,
    ) -> Result<ClassificationResult> {
        self.scorer.score(document, strategy)
    }

    /// Tokenize `text` and score it with the given strategy.
    pub fn classify_text(
        &self,
        text: &str,
        tokenizer: &dyn Tokenizer,
        strategy: ScoringStrategy,
    ) -> Result<ClassificationResult> {
        let tokens = tokenizer.tokenize(text)?;
        self.scorer.score(&tokens, strategy)
    }

    /// How often `word` was trained for `class` (0 if never).
    ///
    /// Like the registry lookup, this registers `class` if it was unknown.
    pub fn word_frequency(&self, class: &str, word: &str) -> Result<u64> {
        Ok(self.registry.storage_for(class).get(word)?.unwrap_or(0))
    }

    /// How often `word` was trained for each known class.
    pub fn word_frequencies(&self, word: &str) -> Result<BTreeMap<String, u64>> {
        self.registry
            .storages()
            .into_iter()
            .map(|(class, storage)| Ok((class, storage.get(word)?.unwrap_or(0))))
            .collect()
    }

    /// Sorted snapshot of the frequency table of `class`.
    pub fn word_frequencies_for(&self, class: &str) -> Result<Vec<WordFrequency>> {
        let mut entries: Vec<WordFrequency> = self.registry.storage_for(class).iter()?.collect();
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(entries)
    }

    /// Sum of the totals of all classes.
    pub fn total_words(&self) -> u64 {
        self.registry
            .storages()
            .iter()
            .map(|(_, storage)| storage.total())
            .sum()
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}
