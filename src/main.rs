//! Geoweave - location similarity networks from engagement records
//!
//! Usage:
//!   geoweave run tweets.json              Run the pipeline and write network_data.json
//!   geoweave communities tweets.json      Show the detected communities
//!   geoweave config                       Print the effective configuration
//!   geoweave --help                       Show all commands

use anyhow::Result;
use clap::Parser;

use geoweave::cli::output::OutputMode;
use geoweave::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("geoweave=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);
    geoweave::cli::execute(&cli.command, mode)?;

    Ok(())
}
