//! Scoring output.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classifier::scorer::ScoringStrategy;

/// Per-class scores for one document and the classes that scored highest.
///
/// The scale of `scores` depends on `strategy`: natural-log probabilities for
/// [`ScoringStrategy::Log`], raw Bayes numerators otherwise. Non-finite
/// scores (a class without words has a log score of `-inf`) are serialized as
/// the strings `"-inf"`, `"inf"` or `"NaN"` so the result reads back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Strategy that produced the scores.
    pub strategy: ScoringStrategy,
    /// Score of every known class.
    #[serde(with = "score_map")]
    pub scores: BTreeMap<String, f64>,
    /// Highest value in `scores`.
    #[serde(with = "score")]
    pub max_score: f64,
    /// Every class whose score equals `max_score`, sorted.
    pub max_classes: Vec<String>,
}

impl ClassificationResult {
    /// Build a result, selecting the winners by exact float equality.
    pub fn from_scores(strategy: ScoringStrategy, scores: BTreeMap<String, f64>) -> Self {
        let (max_score, max_classes) = arg_max(&scores, strategy.floor());
        ClassificationResult {
            strategy,
            scores,
            max_score,
            max_classes,
        }
    }

    /// The first winning class, if any class was scored.
    pub fn best_class(&self) -> Option<&str> {
        self.max_classes.first().map(String::as_str)
    }

    /// Whether more than one class shares the highest score.
    pub fn is_tie(&self) -> bool {
        self.max_classes.len() > 1
    }

    /// Score of a single class.
    pub fn score(&self, class: &str) -> Option<f64> {
        self.scores.get(class).copied()
    }
}

/// Find the maximum score and every class reaching it.
///
/// `floor` is the starting maximum; classes are compared without tolerance and
/// visited in label order, so the winners come out sorted.
pub(crate) fn arg_max(scores: &BTreeMap<String, f64>, floor: f64) -> (f64, Vec<String>) {
    let max_score = scores.values().fold(floor, |max, &score| {
        if score > max { score } else { max }
    });

    let max_classes = scores
        .iter()
        .filter(|&(_, &score)| score == max_score)
        .map(|(class, _)| class.clone())
        .collect();

    (max_score, max_classes)
}

/// Wire form of a single score: a JSON number when finite, a string otherwise.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScoreRepr {
    Finite(f64),
    NonFinite(String),
}

impl From<f64> for ScoreRepr {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            ScoreRepr::Finite(value)
        } else {
            ScoreRepr::NonFinite(value.to_string())
        }
    }
}

impl ScoreRepr {
    fn into_f64<E: serde::de::Error>(self) -> std::result::Result<f64, E> {
        match self {
            ScoreRepr::Finite(value) => Ok(value),
            ScoreRepr::NonFinite(text) => match text.parse::<f64>() {
                Ok(value) if !value.is_finite() => Ok(value),
                _ => Err(E::custom(format!("invalid score '{text}'"))),
            },
        }
    }
}

mod score {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        ScoreRepr::from(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        ScoreRepr::deserialize(deserializer)?.into_f64()
    }
}

mod score_map {
    use super::*;

    pub fn serialize<S: Serializer>(
        scores: &BTreeMap<String, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            scores
                .iter()
                .map(|(class, &value)| (class, ScoreRepr::from(value))),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, f64>, D::Error> {
        BTreeMap::<String, ScoreRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|(class, repr)| repr.into_f64().map(|value| (class, value)))
            .collect()
    }
}
