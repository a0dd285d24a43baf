//! Result and metrics files
//!
//! Both files land in the configured output directory as pretty-printed
//! JSON: one with every per-question record, one with the metrics report
//! (which embeds the records it was computed from).

use crate::{
    config::Config,
    metrics::{Outputs, Report},
    Result,
};
use anyhow::Context;
use std::sync::Arc;
use tokio::fs;

/// File name of the per-question results, inside the output directory
const RESULTS_FILE: &str = "results.json";

/// File name of the metrics report, inside the output directory
const METRICS_FILE: &str = "metrics.json";

/// Save the per-question results
pub async fn save_results(config: Arc<Config>, outputs: Arc<Outputs>) -> Result<()> {
    let json = serde_json::to_vec_pretty(&*outputs).context("converting results to JSON")?;
    write(&config, RESULTS_FILE, &json).await
}

/// Save the metrics report
pub async fn save_metrics(config: &Config, report: &Report<'_>) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(report).context("converting the metrics report to JSON")?;
    write(config, METRICS_FILE, &json).await
}

/// Write one output file, creating the output directory as needed
async fn write(config: &Config, file_name: &str, json: &[u8]) -> Result<()> {
    fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| {
            format!(
                "setting up the output directory {}",
                config.output_dir.display()
            )
        })?;
    let path = config.output_dir.join(file_name);
    fs::write(&path, json)
        .await
        .with_context(|| format!("saving {}", path.display()))
}
