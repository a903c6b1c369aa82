//! Tokenizer implementations for text analysis.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//!
//! # Examples
//!
//! ```
//! use naivebayes::analysis::tokenizer::Tokenizer;
//! use naivebayes::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens = tokenizer.tokenize("Hello world").unwrap();
//! assert_eq!(tokens, vec!["Hello", "world"]);
//! ```

use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` to allow use in concurrent contexts.
///
/// # Examples
///
/// Implementing a custom tokenizer:
///
/// ```
/// use naivebayes::analysis::tokenizer::Tokenizer;
/// use naivebayes::error::Result;
///
/// struct CommaTokenizer;
///
/// impl Tokenizer for CommaTokenizer {
///     fn tokenize(&self, text: &str) -> Result<Vec<String>> {
///         Ok(text
///             .split(',')
///             .map(str::trim)
///             .filter(|s| !s.is_empty())
///             .map(String::from)
///             .collect())
///     }
///
///     fn name(&self) -> &'static str {
///         "comma"
///     }
/// }
///
/// assert_eq!(CommaTokenizer.tokenize("a, b,,c").unwrap(), vec!["a", "b", "c"]);
/// ```
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text, in order of appearance.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod unicode_word;
pub mod whitespace;
