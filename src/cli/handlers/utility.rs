//! CLI handlers for utility commands.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{output_json, OutputMode};

pub fn handle_config(config: Option<&Path>, mode: OutputMode) -> Result<()> {
    let config = super::resolve_config(config)?;
    if mode == OutputMode::Json {
        output_json(&config);
    } else {
        let toml = toml::to_string_pretty(&config)
            .map_err(|e| anyhow::anyhow!("Failed to render config: {}", e))?;
        print!("{}", toml);
    }
    Ok(())
}
