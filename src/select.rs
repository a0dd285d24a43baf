//! Best-answer selection
//!
//! Scores every candidate answer against the question, tracks the set of
//! candidates tied at the best score, and draws the winner uniformly from
//! that set. A question where the best score is 0 is resolved as
//! unanswerable no matter which index the draw produced.

use crate::{
    index::PassageIndex,
    score::{self, ScoreError},
};
use rand::{seq::IndexedRandom, Rng};
use serde::{Serialize, Serializer};

/// Outcome of answer selection for one question
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Selection {
    /// Index of the selected candidate answer
    Answer(usize),

    /// No candidate showed any association with the question
    Unanswerable,
}
//
impl Serialize for Selection {
    /// Serialize as the candidate index, with -1 as the unanswerable
    /// sentinel
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Answer(index) => serializer.serialize_i64(index as i64),
            Self::Unanswerable => serializer.serialize_i64(-1),
        }
    }
}

/// Scoring outcome of one question
///
/// Append-only output of the selector: created once, then only read by the
/// metrics aggregator and the output files.
#[derive(Clone, Debug, Serialize)]
pub struct ResultRecord {
    /// Question text
    pub question: Box<str>,

    /// Association score of each candidate answer, in candidate order
    pub scores: Vec<f64>,

    /// Selected candidate, or the unanswerable sentinel
    pub answer: Selection,

    /// Ground-truth label, when the dataset provides one
    pub target: Option<Selection>,
}

/// Score all candidates and select the best one
///
/// The running maximum starts at 0, so candidates scoring 0 tie with it
/// from the start; every strictly greater score resets the tie set. The
/// winner is drawn uniformly from the final tie set through the injected
/// generator, which makes selection a pure function of its inputs for a
/// fixed generator state.
pub fn select(
    question: &str,
    candidates: &[&str],
    index: &PassageIndex,
    window: usize,
    target: Option<Selection>,
    rng: &mut impl Rng,
) -> Result<ResultRecord, ScoreError> {
    if candidates.is_empty() {
        return Err(ScoreError::NoCandidates);
    }
    let mut scores = Vec::with_capacity(candidates.len());
    let mut best = 0.0_f64;
    let mut ties = Vec::new();
    for (candidate, text) in candidates.iter().enumerate() {
        let score = score::sentence_score(question, text, index, window)?;
        if score > best {
            best = score;
            ties.clear();
            ties.push(candidate);
        } else if score == best {
            ties.push(candidate);
        }
        scores.push(score);
    }
    let drawn = *ties
        .choose(rng)
        .expect("scores are never negative, so the tie set cannot be empty");
    let answer = if best == 0.0 {
        Selection::Unanswerable
    } else {
        Selection::Answer(drawn)
    };
    Ok(ResultRecord {
        question: question.into(),
        scores,
        answer,
        target,
    })
}
