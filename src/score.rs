//! Association scoring between question and answer texts
//!
//! The pair score is an unnormalized pointwise mutual information ratio:
//! windowed co-occurrence count over the product of the two n-grams'
//! passage frequencies. It is deliberately not log-scaled and not
//! normalized by passage length.

use crate::{index::PassageIndex, TokenSeq};
use thiserror::Error;

/// Failure modes of the scoring engine
///
/// These are terminal for the question/answer pair being processed; the
/// engine never retries or recovers internally. Whether one failing
/// question aborts a whole run is the caller's policy.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScoreError {
    /// A non-positive maximum n-gram order was requested
    #[error("invalid maximum n-gram order {0}, must be at least 1")]
    InvalidOrder(usize),

    /// A sentence score was requested for two texts with no extractable
    /// n-grams at any order
    #[error("no n-gram pair contributed to the sentence score")]
    NoContributions,

    /// Answer selection was attempted with an empty candidate list
    #[error("cannot select an answer from an empty candidate list")]
    NoCandidates,

    /// A pair score was requested with a zero-frequency operand
    #[error("association score requested for a zero-frequency n-gram")]
    DivisionUndefined,
}

/// Association score of two scored n-grams of the same order
///
/// Callers must branch on zero frequencies before calling: a zero operand
/// is a [`ScoreError::DivisionUndefined`] error, not a zero score.
pub fn pair_score(
    index: &PassageIndex,
    (a, freq_a): (&TokenSeq, usize),
    (b, freq_b): (&TokenSeq, usize),
    order: usize,
    window: usize,
) -> Result<f64, ScoreError> {
    if freq_a == 0 || freq_b == 0 {
        return Err(ScoreError::DivisionUndefined);
    }
    let co_occurrences = index.co_occurrence(a, b, order, window);
    Ok(co_occurrences as f64 / (freq_a * freq_b) as f64)
}

/// Mean association between a question and one candidate answer
///
/// Every admissible n-gram pair at every order contributes one value, and
/// the result is the arithmetic mean of all contributions. Zero passage
/// frequencies short-circuit asymmetrically, and the asymmetry is part of
/// the scoring definition:
///
/// - A question n-gram absent from the passage contributes a single 0 and
///   is not paired against any answer n-gram.
/// - An answer n-gram absent from the passage contributes a 0 per pairing.
///
/// Both paths change the denominator of the mean differently.
pub fn sentence_score(
    question: &str,
    answer: &str,
    index: &PassageIndex,
    window: usize,
) -> Result<f64, ScoreError> {
    let question_ngrams = index.extract(question);
    let answer_ngrams = index.extract(answer);
    let mut contributions = Vec::new();
    for order in 1..=index.max_order() {
        let questions = &question_ngrams[order - 1];
        let answers = &answer_ngrams[order - 1];
        for (question_ngram, &question_freq) in questions {
            if question_freq == 0 {
                contributions.push(0.0);
                continue;
            }
            for (answer_ngram, &answer_freq) in answers {
                if answer_freq == 0 {
                    contributions.push(0.0);
                } else {
                    contributions.push(pair_score(
                        index,
                        (question_ngram, question_freq),
                        (answer_ngram, answer_freq),
                        order,
                        window,
                    )?);
                }
            }
        }
    }
    if contributions.is_empty() {
        return Err(ScoreError::NoContributions);
    }
    Ok(contributions.iter().sum::<f64>() / contributions.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    const PASSAGE: &str = "the cat sat on the mat";

    fn ngram(tokens: &[&str]) -> TokenSeq {
        tokens.iter().map(|&token| Token::from(token)).collect()
    }

    #[test]
    fn pair_score_is_the_co_occurrence_to_frequency_ratio() {
        let index = PassageIndex::build(PASSAGE, 1).unwrap();
        // co_occurrence("the", "mat") = 2 at window 10, freq("the") = 2,
        // freq("mat") = 1
        let score = pair_score(&index, (&ngram(&["the"]), 2), (&ngram(&["mat"]), 1), 1, 10);
        assert_eq!(score, Ok(1.0));
    }

    #[test]
    fn pair_score_rejects_zero_frequencies() {
        let index = PassageIndex::build(PASSAGE, 1).unwrap();
        let the = ngram(&["the"]);
        let dog = ngram(&["dog"]);
        assert_eq!(
            pair_score(&index, (&the, 2), (&dog, 0), 1, 10),
            Err(ScoreError::DivisionUndefined)
        );
        assert_eq!(
            pair_score(&index, (&dog, 0), (&the, 2), 1, 10),
            Err(ScoreError::DivisionUndefined)
        );
    }

    #[test]
    fn sentence_score_matches_the_hand_computed_scenario() {
        let index = PassageIndex::build(PASSAGE, 1).unwrap();
        // "the dog": the-the scores 4/4, the-dog contributes 0, cat-the
        // scores 2/2, cat-dog contributes 0, mean of [1, 0, 1, 0]
        assert_eq!(sentence_score("the cat", "the dog", &index, 10), Ok(0.5));
        // "a mat": a is absent so both pairings contribute 0, the-mat
        // scores 2/2, cat-mat scores 1/1, mean of [0, 1, 0, 1]
        assert_eq!(sentence_score("the cat", "a mat", &index, 10), Ok(0.5));
    }

    #[test]
    fn zero_frequency_question_ngrams_contribute_exactly_once() {
        let index = PassageIndex::build("x y z", 1).unwrap();
        // "qqq" is absent and contributes one 0 despite two answer ngrams;
        // "x" pairs against both, scoring 1 each at window 10
        assert_eq!(
            sentence_score("qqq x", "y z", &index, 10),
            Ok((0.0 + 1.0 + 1.0) / 3.0)
        );
    }

    #[test]
    fn zero_frequency_short_circuit_applies_per_order() {
        let index = PassageIndex::build("x y z", 2).unwrap();
        // Order 1 contributes [0, 1, 1] as above; at order 2 the single
        // question bigram "qqq x" is absent and contributes one more 0
        // without pairing against the answer bigram "y z"
        assert_eq!(sentence_score("qqq x", "y z", &index, 10), Ok(0.5));
    }

    #[test]
    fn empty_passages_score_zero_for_any_texts() {
        let index = PassageIndex::build("", 2).unwrap();
        assert_eq!(sentence_score("the cat", "a mat", &index, 10), Ok(0.0));
    }

    #[test]
    fn texts_without_ngrams_cannot_be_scored() {
        let index = PassageIndex::build(PASSAGE, 2).unwrap();
        assert_eq!(
            sentence_score("", "", &index, 10),
            Err(ScoreError::NoContributions)
        );
        // A question with no passage-frequency-zero ngrams against an empty
        // answer contributes nothing either
        assert_eq!(
            sentence_score("the", "", &index, 10),
            Err(ScoreError::NoContributions)
        );
    }
}
