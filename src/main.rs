//! Answer multiple-choice reading comprehension questions by measuring
//! windowed lexical co-occurrence (an unnormalized pointwise mutual
//! information ratio) between each question and its candidate answers, with
//! all statistics gathered from the enclosing passage.

mod config;
mod dataset;
mod index;
mod metrics;
mod output;
mod progress;
mod score;
mod select;
mod solve;
mod tokenize;

use crate::{config::Config, progress::ProgressReport};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Score multiple-choice reading comprehension questions from the lexical
/// statistics of their enclosing passage
///
/// Each candidate answer is scored by the mean windowed co-occurrence
/// strength between question n-grams and answer n-grams, and the
/// best-scoring candidate wins. A question where every candidate shows zero
/// association with the passage is resolved as unanswerable.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Path of the JSON dataset to be scored
    ///
    /// The dataset holds a set of entries, each with a list of paragraphs;
    /// each paragraph holds a context text and the question records asked
    /// against it.
    #[arg(long = "dataset_filename")]
    dataset_filename: PathBuf,

    /// Directory where the results and metrics files are written
    ///
    /// Will be created if it does not exist yet. Existing result files in
    /// this directory are overwritten.
    #[arg(long = "output_dir", default_value = "IR_output_0")]
    output_dir: PathBuf,

    /// Maximum n-gram order
    ///
    /// Question and answer texts are compared at every n-gram order from 1
    /// up to this value. Orders longer than a text simply contribute no
    /// n-grams, so raising this beyond the length of typical questions only
    /// costs processing time.
    #[arg(short = 'n', long = "max_order", default_value = "4")]
    max_order: NonZeroUsize,

    /// Co-occurrence window half-width, in n-gram positions
    ///
    /// Two n-grams are considered to co-occur when they appear within this
    /// distance of each other anywhere in the passage.
    #[arg(short, long, default_value = "10")]
    window: usize,

    /// Seed of the tie-breaking random generator
    ///
    /// Candidates tied at the best score are separated by a uniform random
    /// draw. Two runs with the same seed select the same answers.
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Abort on the first question that fails to score
    ///
    /// By default, a question that the scoring engine rejects (e.g. one
    /// whose question and answer texts tokenize to nothing) is logged and
    /// skipped, and the run carries on with the remaining questions.
    #[arg(long)]
    strict: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        // Decode CLI arguments
        let args = Args::parse();

        // Check CLI arguments for basic sanity
        anyhow::ensure!(
            args.window >= 1,
            "a zero co-occurrence window would resolve every question as unanswerable"
        );
        Ok(args)
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let config = Config::new(args);

    // Load the dataset, failing fast on malformed records
    let dataset = dataset::load(&config.dataset_filename).await?;

    // Set up progress reporting
    let report = ProgressReport::new();

    // Score every question of every passage
    let outputs = Arc::new(solve::score_dataset(&config, &dataset, &report)?);

    // Start saving the per-question results...
    let save_results = tokio::spawn(output::save_results(config.clone(), outputs.clone()));

    // ...and aggregate dataset-level metrics in the meantime
    let metrics = metrics::evaluate(&outputs);
    output::save_metrics(&config, &metrics).await?;

    // Wait until the results file is on disk too
    save_results.await.context("saving per-question results")??;

    // Display a metrics summary
    {
        let stdout = tokio::io::stdout();
        let mut stdout = BufWriter::new(stdout);
        let summary = format!(
            "{} questions scored, {:.1}% resolved as unanswerable\n\
             accuracy {:.3}, unanswerable F1 {:.3}, correct answer F1 {:.3}\n",
            outputs.len(),
            metrics.unanswerable_ratio * 100.0,
            metrics.accuracy,
            metrics.unanswerable.f1,
            metrics.correct_answer.f1,
        );
        stdout.write_all(summary.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Lowercased word token from the tokenizer
pub type Token = Box<str>;

/// Immutable n-gram: an ordered, fixed-length sequence of tokens
///
/// Two n-grams are equal iff their token sequences are equal, regardless of
/// the passage positions they were extracted from.
pub type TokenSeq = Box<[Token]>;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}

/// Use jemalloc for improved multi-thread performance
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;
