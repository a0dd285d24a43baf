//! Dataset traversal
//!
//! Passages are independent, so paragraphs are processed in parallel. Each
//! paragraph gets one [`PassageIndex`], built once and shared by all of
//! that paragraph's questions; each question gets its own seeded random
//! generator so that results do not depend on scheduling.

use crate::{
    config::Config,
    dataset::{Dataset, Paragraph},
    index::PassageIndex,
    metrics::Outputs,
    progress::{ProgressConfig, ProgressReport, Work},
    select::{self, ResultRecord},
    Result,
};
use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Score every question of the dataset
pub fn score_dataset(
    config: &Config,
    dataset: &Dataset,
    report: &ProgressReport,
) -> Result<Outputs> {
    let paragraphs = (dataset.data.iter())
        .flat_map(|entry| entry.paragraphs.iter())
        .collect::<Vec<_>>();
    let progress = report.add(
        "Scoring passages",
        ProgressConfig::new(Work::Steps(paragraphs.len())),
    );
    let records = paragraphs
        .into_par_iter()
        .map(|paragraph| {
            let records = score_paragraph(config, paragraph);
            progress.make_progress(1);
            records
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(records.into_iter().flatten().collect())
}

/// Score the questions of one paragraph against its passage
fn score_paragraph(
    config: &Config,
    paragraph: &Paragraph,
) -> Result<Vec<(Box<str>, ResultRecord)>> {
    let index = PassageIndex::build(&paragraph.context, config.max_order.get())
        .context("indexing a passage")?;
    let mut records = Vec::with_capacity(paragraph.qas.len());
    for question in &paragraph.qas {
        let (candidates, target) = question.candidates();
        let mut rng = question_rng(config.seed, &question.id);
        match select::select(
            &question.question,
            &candidates,
            &index,
            config.window,
            target,
            &mut rng,
        ) {
            Ok(record) => {
                log::trace!("Scored question {:?} as {:?}", question.id, record.answer);
                records.push((question.id.as_str().into(), record));
            }
            Err(error) if !config.strict => {
                log::warn!("Skipping question {:?}: {error}", question.id);
            }
            Err(error) => {
                return Err(error).with_context(|| format!("scoring question {:?}", question.id));
            }
        }
    }
    Ok(records)
}

/// Per-question random generator for tie-breaking
///
/// Seeded from the global seed and the question id, so a fixed seed
/// reproduces every selection no matter how rayon schedules paragraphs.
fn question_rng(seed: u64, id: &str) -> StdRng {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    StdRng::seed_from_u64(seed ^ hasher.finish())
}
