//! CLI handler for the full pipeline run.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{
    output_json, print_header, print_hint, print_kv, print_success, print_table, OutputMode,
};
use crate::services::{NetworkExport, RunSummary};

pub fn handle_run(
    input: &Path,
    config: Option<&Path>,
    output: &Path,
    max_edges: Option<usize>,
    mode: OutputMode,
) -> Result<()> {
    let mut config = super::resolve_config(config)?;
    if max_edges.is_some() {
        config.export.max_edges = max_edges;
    }

    let result = super::run_pipeline(input, config.clone())?;
    let export = NetworkExport::from_output(&result, &config);
    export
        .write_json(output)
        .map_err(|e| anyhow::anyhow!("Export failed: {}", e))?;

    let summary = result.summary();
    if mode == OutputMode::Json {
        output_json(&summary);
        return Ok(());
    }

    print_success(&format!("Wrote {}", output.display()));
    print_summary(&summary);
    if export.metadata.exported_edge_count < export.metadata.edge_count {
        print_hint(&format!(
            "Exported the strongest {} of {} edges.",
            export.metadata.exported_edge_count, export.metadata.edge_count
        ));
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    print_header("Run summary");
    print_table(
        &["Locations", "Edges", "Communities", "Inter-community edges", "Modularity"],
        vec![vec![
            summary.locations.to_string(),
            summary.edges.to_string(),
            summary.communities.to_string(),
            summary.inter_community_edges.to_string(),
            format!("{:.4}", summary.modularity),
        ]],
    );
    if summary.dropped_records > 0 {
        print_kv("Dropped records", &summary.dropped_records.to_string());
    }
    if summary.sparse_locations > 0 {
        print_kv("Sparse locations", &summary.sparse_locations.to_string());
    }
}
