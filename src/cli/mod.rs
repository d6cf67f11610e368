//! CLI interface for Geoweave.

pub mod handlers;
pub mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use output::OutputMode;

/// Geoweave - cluster and lay out locations by engagement similarity
#[derive(Parser)]
#[command(name = "geoweave", version, about, long_about = None)]
pub struct Cli {
    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the network export
    Run {
        /// Record file (.json, .yaml or .yml)
        input: PathBuf,
        /// Pipeline config file (TOML, or JSON with a .json extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Export destination
        #[arg(long, short, default_value = "network_data.json")]
        output: PathBuf,
        /// Keep only the strongest N location edges in the export
        #[arg(long)]
        max_edges: Option<usize>,
    },

    /// Run the pipeline and list the detected communities
    Communities {
        /// Record file (.json, .yaml or .yml)
        input: PathBuf,
        /// Pipeline config file (TOML, or JSON with a .json extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum communities to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Pipeline config file to resolve instead of the default lookup
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

pub fn execute(command: &Commands, mode: OutputMode) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            input,
            config,
            output,
            max_edges,
        } => handlers::run::handle_run(input, config.as_deref(), output, *max_edges, mode)?,
        Commands::Communities {
            input,
            config,
            limit,
        } => handlers::communities::handle_communities(input, config.as_deref(), *limit, mode)?,
        Commands::Config { config } => handlers::utility::handle_config(config.as_deref(), mode)?,
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "geoweave",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "geoweave",
            "run",
            "tweets.json",
            "--max-edges",
            "500",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Run {
                input,
                output,
                max_edges,
                ..
            } => {
                assert_eq!(input, PathBuf::from("tweets.json"));
                assert_eq!(output, PathBuf::from("network_data.json"));
                assert_eq!(max_edges, Some(500));
            }
            _ => panic!("expected run"),
        }
    }
}
