//! Error types for the naivebayes library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`NaiveBayesError`] enum. Scoring failures are split into two kinds a caller
//! usually wants to tell apart:
//!
//! - [`NaiveBayesError::NoData`] when nothing has been trained yet
//! - [`NaiveBayesError::Underflow`] when the safe-probability strategy detects
//!   that raw probabilities are no longer reliable
//!
//! # Examples
//!
//! ```
//! use naivebayes::classifier::NaiveBayesClassifier;
//! use naivebayes::error::NaiveBayesError;
//!
//! let classifier = NaiveBayesClassifier::new();
//! match classifier.log_scores(&["hello"]) {
//!     Err(e) if e.is_no_data() => {}
//!     other => panic!("expected a data error, got {other:?}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for naivebayes operations.
#[derive(Error, Debug)]
pub enum NaiveBayesError {
    /// I/O errors (configuration files, disk-backed storages)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Scoring was requested before any word was registered
    #[error("Data error: {0}")]
    NoData(String),

    /// Raw-probability scoring disagreed with log-domain scoring
    #[error("Underflow error: {0}")]
    Underflow(String),

    /// Storage backend failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Tokenization errors
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Rejected configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Thread join errors
    #[error("Thread join error: {0}")]
    ThreadJoinError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with NaiveBayesError.
pub type Result<T> = std::result::Result<T, NaiveBayesError>;

impl NaiveBayesError {
    /// Create a new no-data error.
    pub fn no_data<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::NoData(msg.into())
    }

    /// Create a new underflow error.
    pub fn underflow<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::Underflow(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::InvalidConfig(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::OperationCancelled(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        NaiveBayesError::Other(msg.into())
    }

    /// Whether this error means the classifier has no training data.
    pub fn is_no_data(&self) -> bool {
        matches!(self, NaiveBayesError::NoData(_))
    }

    /// Whether this error is an underflow detected by safe-probability scoring.
    pub fn is_underflow(&self) -> bool {
        matches!(self, NaiveBayesError::Underflow(_))
    }

    /// Whether this error was raised by a storage backend.
    pub fn is_storage(&self) -> bool {
        matches!(self, NaiveBayesError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = NaiveBayesError::no_data("No words registered");
        assert_eq!(error.to_string(), "Data error: No words registered");
        assert!(error.is_no_data());

        let error = NaiveBayesError::underflow("Possible underflow detected");
        assert_eq!(error.to_string(), "Underflow error: Possible underflow detected");
        assert!(error.is_underflow());

        let error = NaiveBayesError::storage("disk full");
        assert_eq!(error.to_string(), "Storage error: disk full");
        assert!(error.is_storage());
        assert!(!error.is_no_data());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = NaiveBayesError::from(io_error);

        match error {
            NaiveBayesError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
