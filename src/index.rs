//! Per-passage n-gram statistics
//!
//! A [`PassageIndex`] is built once per passage and then shared, read-only,
//! by every question scored against that passage. It holds two views of the
//! same data for each n-gram order:
//!
//! - The ordered n-gram sequence, one entry per sliding-window position.
//!   Passage order is load-bearing: windowed co-occurrence counting walks
//!   this sequence.
//! - A frequency table over the distinct n-grams observed.

use crate::{score::ScoreError, tokenize, Token, TokenSeq};
use std::collections::HashMap;

/// N-gram statistics of one passage, for every order up to a maximum
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PassageIndex {
    /// Ordered n-gram sequence per order, one entry per sliding-window
    /// position in the passage
    sequences: Vec<Vec<TokenSeq>>,

    /// Occurrence count of each distinct n-gram, per order
    ///
    /// Invariant: for every order, the counts sum to the length of the
    /// corresponding sequence, and every sequence entry has a nonzero count.
    frequencies: Vec<HashMap<TokenSeq, usize>>,
}
//
impl PassageIndex {
    /// Index a passage for all n-gram orders in `1..=max_order`
    ///
    /// An empty passage yields empty sequences and tables for all orders,
    /// which is not an error.
    pub fn build(passage: &str, max_order: usize) -> Result<Self, ScoreError> {
        if max_order < 1 {
            return Err(ScoreError::InvalidOrder(max_order));
        }
        let tokens = tokenize::words(passage);
        let mut sequences = Vec::with_capacity(max_order);
        let mut frequencies = Vec::with_capacity(max_order);
        for order in 1..=max_order {
            let sequence = ngrams(&tokens, order);
            let mut frequency = HashMap::new();
            for ngram in &sequence {
                *frequency.entry(ngram.clone()).or_insert(0) += 1;
            }
            sequences.push(sequence);
            frequencies.push(frequency);
        }
        Ok(Self {
            sequences,
            frequencies,
        })
    }

    /// Maximum n-gram order this index was built for
    pub fn max_order(&self) -> usize {
        self.sequences.len()
    }

    /// Ordered n-gram sequence of one order
    pub fn sequence(&self, order: usize) -> &[TokenSeq] {
        &self.sequences[order - 1]
    }

    /// Frequency table of one order
    pub fn frequency(&self, order: usize) -> &HashMap<TokenSeq, usize> {
        &self.frequencies[order - 1]
    }

    /// Extract scored n-grams from a question or answer text
    ///
    /// Returns, for each order in `1..=max_order`, the mapping from each
    /// distinct n-gram of `text` to that n-gram's frequency in *this
    /// passage*, not in `text` itself. An n-gram that never occurs in the
    /// passage maps to 0.
    pub fn extract(&self, text: &str) -> Vec<HashMap<TokenSeq, usize>> {
        let tokens = tokenize::words(text);
        (1..=self.max_order())
            .map(|order| {
                ngrams(&tokens, order)
                    .into_iter()
                    .map(|ngram| {
                        let count = self.frequency(order).get(&ngram).copied().unwrap_or(0);
                        (ngram, count)
                    })
                    .collect()
            })
            .collect()
    }

    /// Count windowed co-occurrences of two n-grams in the passage
    ///
    /// Comparison uses only the first token of each n-gram, for the anchor
    /// and the match alike. For every position `j` whose n-gram starts like
    /// `a`, matches are counted over the half-open position range
    /// `[j - window, j + window)` clipped to passage bounds; the anchor
    /// position itself is not excluded, so an n-gram starting like both `a`
    /// and `b` counts its own position.
    pub fn co_occurrence(&self, a: &TokenSeq, b: &TokenSeq, order: usize, window: usize) -> usize {
        let (Some(first_a), Some(first_b)) = (a.first(), b.first()) else {
            return 0;
        };
        let sequence = self.sequence(order);
        let mut count = 0;
        for (anchor, ngram) in sequence.iter().enumerate() {
            if ngram.first() != Some(first_a) {
                continue;
            }
            let start = anchor.saturating_sub(window);
            let end = (anchor + window).min(sequence.len());
            count += sequence[start..end]
                .iter()
                .filter(|other| other.first() == Some(first_b))
                .count();
        }
        count
    }
}

/// Sliding-window n-grams of one order, in text order
///
/// A text shorter than the order has no n-grams at that order.
fn ngrams(tokens: &[Token], order: usize) -> Vec<TokenSeq> {
    tokens.windows(order).map(|window| window.into()).collect()
}
