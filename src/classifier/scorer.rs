//! Document scoring.
//!
//! Every strategy starts from the class priors, `P(class) = total(class) /
//! sum of all totals`, and combines them with the per-word probabilities
//! reported by each class's storage:
//!
//! - [`ScoringStrategy::Log`]: `ln P(class) + Σ ln P(word | class)`. Stable for
//!   long documents and the recommended default.
//! - [`ScoringStrategy::Probability`]: `P(class) × Π P(word | class)`, the
//!   plain Bayes numerator. It underflows to `0.0` for long documents or
//!   documents full of unseen words, after which every class ties. Nothing
//!   compensates for this; use it as a baseline only.
//! - [`ScoringStrategy::SafeProbability`]: the raw numerator, cross-checked
//!   against the log-domain result. The *set* of winning classes of both
//!   computations must be identical, otherwise the call fails with
//!   [`NaiveBayesError::Underflow`]. Raw and log scores are never compared by
//!   value since they live on different scales.
//!
//! Winners are chosen by exact float equality with the maximum; near-ties are
//! not merged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::registry::ClassifierRegistry;
use crate::classifier::result::{ClassificationResult, arg_max};
use crate::error::{NaiveBayesError, Result};
use crate::storage::WordStorage;

/// How document scores are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Sum of natural-log probabilities.
    #[default]
    Log,
    /// Product of raw probabilities; underflow-prone.
    Probability,
    /// Raw probabilities, rejected when they disagree with the log-domain winners.
    SafeProbability,
}

impl ScoringStrategy {
    /// Get the name of this strategy (for debugging and logging).
    pub fn name(&self) -> &'static str {
        match self {
            ScoringStrategy::Log => "log",
            ScoringStrategy::Probability => "probability",
            ScoringStrategy::SafeProbability => "safe_probability",
        }
    }

    /// Lowest score the arg-max scan starts from.
    pub(crate) fn floor(&self) -> f64 {
        match self {
            ScoringStrategy::Log => f64::NEG_INFINITY,
            ScoringStrategy::Probability | ScoringStrategy::SafeProbability => 0.0,
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type ClassStorage = (String, Arc<dyn WordStorage>);

/// Read-only scorer over all storages of a registry.
#[derive(Debug, Clone)]
pub struct Scorer {
    registry: Arc<ClassifierRegistry>,
    parallel: bool,
}

impl Scorer {
    /// Create a scorer reading from `registry`.
    ///
    /// With `parallel` set, classes are scored on the rayon thread pool. Each
    /// class is still evaluated sequentially, so scores do not change.
    pub fn new(registry: Arc<ClassifierRegistry>, parallel: bool) -> Self {
        Scorer { registry, parallel }
    }

    /// Prior probability of every known class.
    ///
    /// Fails with [`NaiveBayesError::NoData`] when no word has been stored for
    /// any class.
    pub fn prior_probabilities(&self) -> Result<BTreeMap<String, f64>> {
        priors(&self.registry.storages())
    }

    /// Score `document` against every class in the log domain.
    pub fn log_scores<S: AsRef<str> + Sync>(&self, document: &[S]) -> Result<ClassificationResult> {
        self.score(document, ScoringStrategy::Log)
    }

    /// Score `document` with raw, underflow-prone probabilities.
    pub fn probabilities<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
    ) -> Result<ClassificationResult> {
        self.score(document, ScoringStrategy::Probability)
    }

    /// Score `document` with raw probabilities, failing on detected underflow.
    pub fn safe_probabilities<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
    ) -> Result<ClassificationResult> {
        self.score(document, ScoringStrategy::SafeProbability)
    }

    /// Score `document` with the given strategy.
    pub fn score<S: AsRef<str> + Sync>(
        &self,
        document: &[S],
        strategy: ScoringStrategy,
    ) -> Result<ClassificationResult> {
        let storages = self.registry.storages();
        let priors = priors(&storages)?;

        let per_class = self.per_class(&storages, |class, storage| {
            let prior = priors.get(class).copied().unwrap_or(0.0);
            let probabilities = word_probabilities(storage, document)?;
            Ok(match strategy {
                ScoringStrategy::Log => (log_score(prior, &probabilities), None),
                ScoringStrategy::Probability => (raw_score(prior, &probabilities), None),
                ScoringStrategy::SafeProbability => (
                    raw_score(prior, &probabilities),
                    Some(log_score(prior, &probabilities)),
                ),
            })
        })?;

        let mut scores = BTreeMap::new();
        let mut log_scores = BTreeMap::new();
        for (class, (score, log)) in per_class {
            if let Some(log) = log {
                log_scores.insert(class.clone(), log);
            }
            scores.insert(class, score);
        }

        let result = ClassificationResult::from_scores(strategy, scores);

        if strategy == ScoringStrategy::SafeProbability {
            let (_, log_winners) = arg_max(&log_scores, ScoringStrategy::Log.floor());
            if log_winners != result.max_classes {
                warn!(
                    raw_winners = ?result.max_classes,
                    log_winners = ?log_winners,
                    document_len = document.len(),
                    "raw probability winners disagree with log-domain winners"
                );
                return Err(NaiveBayesError::underflow(format!(
                    "Possible underflow detected: raw winners {:?} differ from log winners {:?}",
                    result.max_classes, log_winners
                )));
            }
        }

        debug!(
            strategy = strategy.name(),
            classes = result.scores.len(),
            document_len = document.len(),
            winners = ?result.max_classes,
            "scored document"
        );
        Ok(result)
    }

    fn per_class<T, F>(&self, storages: &[ClassStorage], f: F) -> Result<Vec<(String, T)>>
    where
        T: Send,
        F: Fn(&str, &dyn WordStorage) -> Result<T> + Sync,
    {
        let evaluate = |(class, storage): &ClassStorage| {
            f(class, storage.as_ref()).map(|value| (class.clone(), value))
        };

        if self.parallel {
            storages.par_iter().map(evaluate).collect()
        } else {
            storages.iter().map(evaluate).collect()
        }
    }
}

fn priors(storages: &[ClassStorage]) -> Result<BTreeMap<String, f64>> {
    // One read per storage, so the priors sum to one even while training runs.
    let totals: Vec<(&str, u64)> = storages
        .iter()
        .map(|(class, storage)| (class.as_str(), storage.total()))
        .collect();

    let sum: u64 = totals.iter().map(|&(_, total)| total).sum();
    if sum == 0 {
        return Err(NaiveBayesError::no_data(
            "sum of all word counts is 0, no words registered",
        ));
    }

    let sum = sum as f64;
    Ok(totals
        .into_iter()
        .map(|(class, total)| (class.to_string(), total as f64 / sum))
        .collect())
}

fn word_probabilities<S: AsRef<str>>(
    storage: &dyn WordStorage,
    document: &[S],
) -> Result<Vec<f64>> {
    document
        .iter()
        .map(|word| storage.word_probability(word.as_ref()))
        .collect()
}

fn log_score(prior: f64, probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .fold(prior.ln(), |score, probability| score + probability.ln())
}

fn raw_score(prior: f64, probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .fold(prior, |score, probability| score * probability)
}
