//! CLI command handlers.

pub mod communities;
pub mod run;
pub mod utility;

use std::path::Path;

use anyhow::Result;

use crate::config::{load_pipeline_config, PipelineConfig};
use crate::services::{load_records, Pipeline, PipelineOutput};

/// Resolve the config relative to the working directory.
pub(crate) fn resolve_config(config: Option<&Path>) -> Result<PipelineConfig> {
    let cwd = std::env::current_dir()?;
    load_pipeline_config(config, &cwd).map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Load records from `input` and run every stage.
pub(crate) fn run_pipeline(input: &Path, config: PipelineConfig) -> Result<PipelineOutput> {
    let records = load_records(input)
        .map_err(|e| anyhow::anyhow!("Failed to load records: {}", e))?;
    let pipeline = Pipeline::new(config).map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    pipeline
        .run(&records)
        .map_err(|e| anyhow::anyhow!("Pipeline failed: {}", e))
}
