//! Text analysis for naivebayes.
//!
//! The classifier treats tokens as opaque strings. This module only provides
//! tokenizers that turn raw text into such strings for the text convenience
//! API; it performs no stemming or stop-word removal.

pub mod tokenizer;
