//! Loading and shaping of the question-answering dataset
//!
//! The dataset is one JSON file of entries, paragraphs and question
//! records. This module owns the input shape and the candidate-list rules;
//! the scoring engine only ever sees a passage text plus per-question
//! candidate texts and a ground-truth label.

use crate::{select::Selection, Result};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use unicase::UniCase;

/// Marker text of the answer slot that stands for "no answer in the
/// passage"
///
/// Compared case-insensitively. This slot is never scored as a candidate:
/// resolving a question as unanswerable is the selector's zero-association
/// override, not a lexical match against this text.
const UNANSWERABLE_MARKER: &str = "not enough information";

/// Load and decode a dataset file
///
/// Malformed records fail here, before any scoring starts, so that scoring
/// failures reported later are genuine algorithmic edge cases rather than
/// bad input shape.
pub async fn load(path: &Path) -> Result<Dataset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading dataset file {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("decoding dataset file {}", path.display()))
}

/// Top-level dataset structure
#[derive(Clone, Debug, Deserialize)]
pub struct Dataset {
    /// Dataset entries, typically one per source document
    pub data: Vec<Entry>,
}

/// One source document
#[derive(Clone, Debug, Deserialize)]
pub struct Entry {
    /// Passages of this document
    pub paragraphs: Vec<Paragraph>,
}

/// A passage and the questions asked against it
#[derive(Clone, Debug, Deserialize)]
pub struct Paragraph {
    /// Passage text that questions and answers are scored against
    pub context: String,

    /// Question records
    pub qas: Vec<Question>,
}

/// A multiple-choice question record
#[derive(Clone, Debug, Deserialize)]
pub struct Question {
    /// Stable identifier, used to key the output files
    pub id: String,

    /// Question text
    pub question: String,

    /// Candidate answer slots, up to four
    pub answers: Vec<AnswerOption>,

    /// Truth that the question is officially unanswerable
    #[serde(default)]
    pub is_impossible: bool,
}
//
impl Question {
    /// Candidate texts for the scoring engine, plus the ground-truth label
    ///
    /// The "not enough information" slot is excluded from the candidates:
    /// when it is the slot marked correct the label becomes the
    /// unanswerable sentinel, otherwise it is just dropped. The returned
    /// label indexes into the returned candidate list, not into the
    /// original slots. Questions flagged impossible are labeled
    /// unanswerable regardless of their slots; questions with no marked
    /// slot have no label.
    pub fn candidates(&self) -> (Vec<&str>, Option<Selection>) {
        let mut candidates = Vec::with_capacity(self.answers.len());
        let mut label = None;
        for answer in &self.answers {
            if UniCase::new(answer.text.trim()) == UniCase::new(UNANSWERABLE_MARKER) {
                if answer.correct {
                    label = Some(Selection::Unanswerable);
                }
                continue;
            }
            if answer.correct && label.is_none() {
                label = Some(Selection::Answer(candidates.len()));
            }
            candidates.push(answer.text.as_str());
        }
        if self.is_impossible {
            label = Some(Selection::Unanswerable);
        }
        (candidates, label)
    }
}

/// One candidate answer slot
#[derive(Clone, Debug, Deserialize)]
pub struct AnswerOption {
    /// Answer text
    pub text: String,

    /// Truth that this slot is the marked correct answer
    #[serde(default)]
    pub correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(json: &str) -> Question {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_a_nested_dataset() {
        let dataset: Dataset = serde_json::from_str(
            r#"{
                "data": [{
                    "paragraphs": [{
                        "context": "the cat sat on the mat",
                        "qas": [{
                            "id": "q1",
                            "question": "the cat",
                            "answers": [
                                {"text": "a mat", "correct": true},
                                {"text": "the dog"}
                            ],
                            "is_impossible": false
                        }]
                    }]
                }]
            }"#,
        )
        .unwrap();
        let paragraph = &dataset.data[0].paragraphs[0];
        assert_eq!(paragraph.context, "the cat sat on the mat");
        let qa = &paragraph.qas[0];
        assert_eq!(qa.id, "q1");
        assert!(qa.answers[0].correct);
        assert!(!qa.answers[1].correct);
    }

    #[test]
    fn rejects_records_with_missing_fields() {
        let malformed = r#"{"data": [{"paragraphs": [{"qas": []}]}]}"#;
        assert!(serde_json::from_str::<Dataset>(malformed).is_err());
    }

    #[test]
    fn labels_the_correct_slot_after_marker_exclusion() {
        let qa = question(
            r#"{
                "id": "q1",
                "question": "why",
                "answers": [
                    {"text": "first"},
                    {"text": "Not enough information"},
                    {"text": "third", "correct": true}
                ]
            }"#,
        );
        let (candidates, label) = qa.candidates();
        // The marker slot is dropped, so the correct slot shifts to index 1
        assert_eq!(candidates, ["first", "third"]);
        assert_eq!(label, Some(Selection::Answer(1)));
    }

    #[test]
    fn a_correct_marker_slot_labels_the_question_unanswerable() {
        let qa = question(
            r#"{
                "id": "q2",
                "question": "why",
                "answers": [
                    {"text": "first"},
                    {"text": "NOT ENOUGH INFORMATION", "correct": true}
                ]
            }"#,
        );
        let (candidates, label) = qa.candidates();
        assert_eq!(candidates, ["first"]);
        assert_eq!(label, Some(Selection::Unanswerable));
    }

    #[test]
    fn the_impossible_flag_wins_over_slot_marks() {
        let qa = question(
            r#"{
                "id": "q3",
                "question": "why",
                "answers": [{"text": "first", "correct": true}],
                "is_impossible": true
            }"#,
        );
        let (candidates, label) = qa.candidates();
        assert_eq!(candidates, ["first"]);
        assert_eq!(label, Some(Selection::Unanswerable));
    }

    #[test]
    fn unmarked_questions_have_no_label() {
        let qa = question(
            r#"{
                "id": "q4",
                "question": "why",
                "answers": [{"text": "first"}, {"text": "second"}]
            }"#,
        );
        let (candidates, label) = qa.candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(label, None);
    }
}
