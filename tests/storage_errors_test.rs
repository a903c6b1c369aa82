use std::sync::Arc;

use crossbeam_channel::unbounded;
use naivebayes::classifier::{ClassifierConfig, NaiveBayesClassifier, ScoringStrategy};
use naivebayes::error::{NaiveBayesError, Result};
use naivebayes::storage::{StorageProvider, WordIter, WordStorage};

/// A backend whose reads and writes always fail.
#[derive(Debug)]
struct BrokenStorage {
    total: u64,
    default_probability: f64,
}

impl WordStorage for BrokenStorage {
    fn get(&self, word: &str) -> Result<Option<u64>> {
        Err(NaiveBayesError::storage(format!("cannot read '{word}'")))
    }

    fn store(&self, word: &str) -> Result<()> {
        Err(NaiveBayesError::storage(format!("cannot write '{word}'")))
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn vocabulary_size(&self) -> usize {
        0
    }

    fn iter(&self) -> Result<WordIter> {
        Err(NaiveBayesError::storage("cannot list words"))
    }

    fn default_probability(&self) -> f64 {
        self.default_probability
    }
}

#[derive(Debug)]
struct BrokenProvider {
    total: u64,
}

impl StorageProvider for BrokenProvider {
    fn create_storage(&self, default_probability: f64) -> Arc<dyn WordStorage> {
        Arc::new(BrokenStorage {
            total: self.total,
            default_probability,
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

fn broken_classifier(total: u64) -> NaiveBayesClassifier {
    NaiveBayesClassifier::with_storage_provider(
        ClassifierConfig::default(),
        Arc::new(BrokenProvider { total }),
    )
    .unwrap()
}

#[test]
fn test_add_words_reports_storage_error() {
    let classifier = broken_classifier(0);
    let result = classifier.add_words("good", &["A", "B"]);

    match result {
        Err(NaiveBayesError::Storage(message)) => assert_eq!(message, "cannot write 'A'"),
        other => panic!("expected a storage error, got {other:?}"),
    }
}

#[test]
fn test_add_from_stream_reports_storage_error() {
    let classifier = broken_classifier(0);
    let (sender, receiver) = unbounded();
    sender.send("A".to_string()).unwrap();
    drop(sender);

    let result = classifier.add_from_stream("good", receiver);
    assert!(matches!(result, Err(NaiveBayesError::Storage(_))));
}

#[test]
fn test_stream_trainer_finish_reports_storage_error() {
    let classifier = broken_classifier(0);
    let stream = classifier.stream_trainer("good").unwrap();
    // The consumer may already have stopped, so this send is allowed to fail.
    let _ = stream.send("A");

    let result = stream.finish();
    assert!(matches!(result, Err(NaiveBayesError::Storage(_))));
}

#[test]
fn test_scoring_reports_storage_error() {
    let classifier = broken_classifier(3);
    classifier.storage_for("good");

    for strategy in [
        ScoringStrategy::Log,
        ScoringStrategy::Probability,
        ScoringStrategy::SafeProbability,
    ] {
        let result = classifier.classify(&["A"], strategy);
        assert!(
            matches!(result, Err(NaiveBayesError::Storage(_))),
            "{strategy} returned {result:?}"
        );
    }
}

#[test]
fn test_frequency_queries_report_storage_error() {
    let classifier = broken_classifier(0);

    assert!(classifier.word_frequency("good", "A").unwrap_err().is_storage());
    assert!(classifier.word_frequencies("A").unwrap_err().is_storage());
    assert!(classifier.word_frequencies_for("good").unwrap_err().is_storage());
}
