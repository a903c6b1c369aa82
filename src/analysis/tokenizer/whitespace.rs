//! Whitespace tokenizer implementation.

use super::Tokenizer;

use crate::error::Result;

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(String::from).collect())
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens = tokenizer.tokenize("hello  world\ttest").unwrap();

        assert_eq!(tokens, vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(WhitespaceTokenizer::new().tokenize("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(WhitespaceTokenizer::new().name(), "whitespace");
    }
}
