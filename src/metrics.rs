//! Dataset-level classification metrics
//!
//! Folds the per-question result records into accuracy, per-class
//! precision/recall/F1 and the share of questions resolved as
//! unanswerable. Questions without a ground-truth label are scored and
//! reported, but only the unanswerable ratio counts them.

use crate::select::{ResultRecord, Selection};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-question results, keyed by question id
///
/// A BTreeMap so that output files list questions in a stable order.
pub type Outputs = BTreeMap<Box<str>, ResultRecord>;

/// Three-way classification outcome of one labeled question
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    /// Resolved as unanswerable
    Unanswerable,

    /// Selected the labeled correct answer
    CorrectAnswer,

    /// Selected some other answer
    WrongAnswer,
}

/// Metrics report, serialized to the metrics output file
#[derive(Clone, Debug, Serialize)]
pub struct Report<'outputs> {
    /// Share of labeled questions whose selection matches the label
    /// (unanswerable sentinel matching the unanswerable label included)
    pub accuracy: f64,

    /// Precision/recall/F1 of the unanswerable class
    pub unanswerable: ClassMetrics,

    /// Precision/recall/F1 of the correctly-answered class
    pub correct_answer: ClassMetrics,

    /// Share of all questions resolved as unanswerable
    pub unanswerable_ratio: f64,

    /// The per-question outputs the metrics were computed from
    pub outputs: &'outputs Outputs,
}

/// Precision, recall and F1 of one class
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
}

/// Aggregate metrics over all result records
pub fn evaluate(outputs: &Outputs) -> Report<'_> {
    let mut labeled = Vec::with_capacity(outputs.len());
    let mut unanswerable_predictions = 0;
    for record in outputs.values() {
        if record.answer == Selection::Unanswerable {
            unanswerable_predictions += 1;
        }
        let Some(target) = record.target else {
            continue;
        };
        let outcome = match (record.answer, target) {
            (Selection::Unanswerable, _) => Outcome::Unanswerable,
            (Selection::Answer(answer), Selection::Answer(correct)) if answer == correct => {
                Outcome::CorrectAnswer
            }
            (Selection::Answer(_), _) => Outcome::WrongAnswer,
        };
        labeled.push((target, outcome));
    }
    let correct = (labeled.iter())
        .filter(|(target, outcome)| match target {
            Selection::Unanswerable => *outcome == Outcome::Unanswerable,
            Selection::Answer(_) => *outcome == Outcome::CorrectAnswer,
        })
        .count();
    Report {
        accuracy: ratio(correct, labeled.len()),
        unanswerable: class_metrics(
            &labeled,
            |target| target == Selection::Unanswerable,
            |outcome| outcome == Outcome::Unanswerable,
        ),
        correct_answer: class_metrics(
            &labeled,
            |target| matches!(target, Selection::Answer(_)),
            |outcome| outcome == Outcome::CorrectAnswer,
        ),
        unanswerable_ratio: ratio(unanswerable_predictions, outputs.len()),
        outputs,
    }
}

/// Precision/recall/F1 of one class over the labeled questions
fn class_metrics(
    labeled: &[(Selection, Outcome)],
    is_target: impl Fn(Selection) -> bool,
    is_prediction: impl Fn(Outcome) -> bool,
) -> ClassMetrics {
    let mut true_positives = 0;
    let mut false_positives = 0;
    let mut false_negatives = 0;
    for &(target, outcome) in labeled {
        match (is_target(target), is_prediction(outcome)) {
            (true, true) => true_positives += 1,
            (false, true) => false_positives += 1,
            (true, false) => false_negatives += 1,
            (false, false) => {}
        }
    }
    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassMetrics {
        precision,
        recall,
        f1,
    }
}

/// Quotient that degrades to 0 instead of NaN on an empty denominator
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(answer: Selection, target: Option<Selection>) -> ResultRecord {
        ResultRecord {
            question: "why".into(),
            scores: vec![0.25, 0.5],
            answer,
            target,
        }
    }

    fn outputs(records: impl IntoIterator<Item = ResultRecord>) -> Outputs {
        (records.into_iter())
            .enumerate()
            .map(|(index, record)| (format!("q{index}").into_boxed_str(), record))
            .collect()
    }

    #[test]
    fn aggregates_accuracy_and_per_class_metrics() {
        let outputs = outputs([
            record(Selection::Answer(0), Some(Selection::Answer(0))),
            record(Selection::Answer(0), Some(Selection::Answer(1))),
            record(Selection::Unanswerable, Some(Selection::Unanswerable)),
            record(Selection::Answer(0), Some(Selection::Unanswerable)),
        ]);
        let report = evaluate(&outputs);
        assert_eq!(report.accuracy, 0.5);
        assert_eq!(report.unanswerable_ratio, 0.25);
        // Unanswerable class: 1 true positive, no false positives, 1 miss
        assert_eq!(report.unanswerable.precision, 1.0);
        assert_eq!(report.unanswerable.recall, 0.5);
        assert_eq!(report.unanswerable.f1, 1.0 / 1.5);
        // Correctly-answered class: 1 of 2 answerable questions solved, and
        // no unanswerable question was "solved"
        assert_eq!(report.correct_answer.precision, 1.0);
        assert_eq!(report.correct_answer.recall, 0.5);
        assert_eq!(report.correct_answer.f1, 1.0 / 1.5);
    }

    #[test]
    fn unlabeled_records_only_count_toward_the_ratio() {
        let outputs = outputs([
            record(Selection::Unanswerable, None),
            record(Selection::Answer(1), Some(Selection::Answer(1))),
        ]);
        let report = evaluate(&outputs);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.unanswerable_ratio, 0.5);
        assert_eq!(report.unanswerable.recall, 0.0);
    }

    #[test]
    fn empty_outputs_yield_zeroed_metrics() {
        let outputs = Outputs::new();
        let report = evaluate(&outputs);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.unanswerable_ratio, 0.0);
        assert_eq!(report.unanswerable.f1, 0.0);
        assert_eq!(report.correct_answer.f1, 0.0);
    }

    #[test]
    fn reports_serialize_with_embedded_outputs() {
        let outputs = outputs([record(Selection::Unanswerable, Some(Selection::Unanswerable))]);
        let report = evaluate(&outputs);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["accuracy"], 1.0);
        assert_eq!(json["unanswerable"]["F1"], 1.0);
        assert_eq!(json["outputs"]["q0"]["answer"], -1);
        assert_eq!(json["outputs"]["q0"]["target"], -1);
    }
}
