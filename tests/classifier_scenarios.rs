use std::io::Write;

use naivebayes::classifier::{
    ClassificationResult, ClassifierConfig, NaiveBayesClassifier, ScoringStrategy,
};
use naivebayes::error::NaiveBayesError;
use naivebayes::storage::DEFAULT_PROBABILITY;
use tempfile::NamedTempFile;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn good_and_bad() -> NaiveBayesClassifier {
    init_tracing();
    let classifier = NaiveBayesClassifier::new();
    classifier.add_words("good", &["A", "B", "C"]).unwrap();
    classifier.add_words("bad", &["D", "E", "F"]).unwrap();
    classifier
}

#[test]
fn test_priors_sum_to_one() {
    let classifier = good_and_bad();
    classifier.add_words("neutral", &["G", "H"]).unwrap();
    classifier.add_words("good", &["A"]).unwrap();

    let priors = classifier.prior_probabilities().unwrap();
    assert_eq!(priors.len(), 3);
    let sum: f64 = priors.values().sum();
    assert!((sum - 1.0).abs() < 1e-12, "priors sum to {sum}");
    assert_eq!(priors["good"], 4.0 / 9.0);
}

#[test]
fn test_smoothing_monotonicity() {
    let classifier = good_and_bad();
    let storage = classifier.storage_for("good");

    let seen = storage.word_probability("A").unwrap();
    assert!(seen > DEFAULT_PROBABILITY);
    assert_eq!(storage.word_probability("Z").unwrap(), DEFAULT_PROBABILITY);
}

#[test]
fn test_log_score_ordering() {
    let classifier = good_and_bad();

    let result = classifier.log_scores(&["A", "B"]).unwrap();
    assert_eq!(result.max_classes, vec!["good"]);

    let result = classifier.log_scores(&["D", "E", "F", "A"]).unwrap();
    assert_eq!(result.max_classes, vec!["bad"]);
    assert!(result.scores["bad"] > result.scores["good"]);
}

#[test]
fn test_tie_production() {
    let classifier = good_and_bad();

    let result = classifier.log_scores(&["D", "C"]).unwrap();
    assert_eq!(result.max_classes, vec!["bad", "good"]);
    assert!(result.is_tie());
    assert_eq!(result.scores["bad"], result.scores["good"]);

    let raw = classifier.probabilities(&["D", "C"]).unwrap();
    assert_eq!(raw.max_classes, vec!["bad", "good"]);

    // Agreeing ties are not an underflow.
    let safe = classifier.safe_probabilities(&["D", "C"]).unwrap();
    assert_eq!(safe.max_classes, vec!["bad", "good"]);
}

#[test]
fn test_underflow_detection() {
    let classifier = good_and_bad();
    let mut document: Vec<String> = (0..40).map(|i| format!("never-seen-{i}")).collect();
    document.push("A".to_string());

    let raw = classifier.probabilities(&document).unwrap();
    assert!(raw.scores.values().all(|&score| score == 0.0));

    let log = classifier.log_scores(&document).unwrap();
    assert_eq!(log.max_classes, vec!["good"]);

    match classifier.safe_probabilities(&document) {
        Err(error) => assert!(error.is_underflow(), "unexpected error {error}"),
        Ok(result) => panic!("expected underflow, got {result:?}"),
    }

    // The documented fallback for callers.
    let fallback = classifier
        .safe_probabilities(&document)
        .or_else(|error| {
            if error.is_underflow() {
                classifier.log_scores(&document)
            } else {
                Err(error)
            }
        })
        .unwrap();
    assert_eq!(fallback.best_class(), Some("good"));
}

#[test]
fn test_no_data_failure() {
    init_tracing();
    let classifier = NaiveBayesClassifier::new();
    // A probed class still has no words.
    classifier.storage_for("probe");

    for strategy in [
        ScoringStrategy::Log,
        ScoringStrategy::Probability,
        ScoringStrategy::SafeProbability,
    ] {
        let result = classifier.classify(&["A"], strategy);
        assert!(matches!(result, Err(NaiveBayesError::NoData(_))));
    }
}

#[test]
fn test_idempotent_registry_lookup() {
    let classifier = good_and_bad();

    let first = classifier.storage_for("good");
    let second = classifier.storage_for("good");
    assert_eq!(first.total(), second.total());
    for word in ["A", "B", "C", "D"] {
        assert_eq!(first.get(word).unwrap(), second.get(word).unwrap());
    }
    assert_eq!(classifier.classes(), vec!["bad", "good"]);
}

#[test]
fn test_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"default_probability": 1e-6, "parallel_scoring": true, "stream_buffer": 0}}"#
    )
    .unwrap();

    let config = ClassifierConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.default_probability, 1e-6);
    assert!(config.parallel_scoring);

    let classifier = NaiveBayesClassifier::with_config(config).unwrap();
    classifier.add_words("a", &["x"]).unwrap();
    let result = classifier.probabilities(&["y"]).unwrap();
    assert_eq!(result.scores["a"], 1e-6);
}

#[test]
fn test_missing_config_file() {
    let result = ClassifierConfig::load_from_file("/nonexistent/naivebayes.json");
    assert!(matches!(result, Err(NaiveBayesError::Io(_))));
}

#[test]
fn test_result_serializes() {
    let classifier = good_and_bad();
    let result = classifier.log_scores(&["A"]).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["strategy"], "log");
    assert_eq!(json["max_classes"][0], "good");
}

#[test]
fn test_result_with_empty_class_round_trips() {
    let classifier = NaiveBayesClassifier::new();
    classifier.add_words("good", &["A"]).unwrap();
    assert_eq!(classifier.word_frequency("unused", "A").unwrap(), 0);

    let result = classifier.log_scores(&["A"]).unwrap();
    assert_eq!(result.scores["unused"], f64::NEG_INFINITY);

    let json = serde_json::to_string(&result).unwrap();
    let decoded: ClassificationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, result);
    assert_eq!(decoded.max_classes, vec!["good"]);
}
