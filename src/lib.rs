//! # naivebayes
//!
//! A multinomial Naive Bayes text classifier for Rust.
//!
//! ## Features
//!
//! - Per-class word-frequency tables behind a pluggable storage trait
//! - Batch, channel-streamed (blocking, cancellable, threaded) and async training
//! - Log-domain, raw-probability and underflow-checked scoring
//! - Deterministic tie handling: every class sharing the top score wins
//! - Configurable smoothing probability for unseen words

pub mod analysis;
pub mod classifier;
pub mod error;
pub mod storage;

pub mod prelude {
    pub use crate::classifier::{
        CancellationToken, ClassificationResult, ClassifierConfig, NaiveBayesClassifier,
        ScoringStrategy, StreamTrainer,
    };
    pub use crate::error::{NaiveBayesError, Result};
    pub use crate::storage::{StorageProvider, WordFrequency, WordStorage};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
