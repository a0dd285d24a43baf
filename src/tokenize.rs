//! Word tokenization
//!
//! The scoring engine treats tokenization as an external capability: all it
//! needs is an ordered sequence of word tokens. This implementation keeps
//! maximal runs of alphanumeric characters (with in-word apostrophes) and
//! lowercases them; punctuation never becomes a token.

use crate::Token;

/// Split a text into lowercased word tokens, in text order
pub fn words(text: &str) -> Vec<Token> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase().into_boxed_str())
        .collect()
}
