//! Unicode word tokenizer implementation.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and drops segments
//! without any alphanumeric character, such as punctuation and whitespace.
//!
//! # Examples
//!
//! ```
//! use naivebayes::analysis::tokenizer::Tokenizer;
//! use naivebayes::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new().with_lowercase(true);
//! let tokens = tokenizer.tokenize("Hello, world!").unwrap();
//! assert_eq!(tokens, vec!["hello", "world"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer {
    lowercase: bool,
}

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer that keeps the original case.
    pub fn new() -> Self {
        UnicodeWordTokenizer { lowercase: false }
    }

    /// Lowercase every token.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split_word_bounds()
            .filter(|word| word.chars().any(|c| c.is_alphanumeric()))
            .map(|word| {
                if self.lowercase {
                    word.to_lowercase()
                } else {
                    word.to_string()
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
