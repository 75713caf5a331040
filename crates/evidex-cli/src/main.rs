use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use evidex_pipeline::config::PipelineConfig;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the JSON result, so logs go to stderr
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let path = commands::config_path(cli.config)?;
    let config = PipelineConfig::load_or_default(&path)?;

    match cli.command {
        Commands::Assess {
            query,
            evidence,
            answer,
        } => commands::assess(config, &query, evidence.as_deref(), answer.as_deref()),
        Commands::Validate { evidence, answer } => commands::validate(config, &evidence, &answer),
        Commands::Config { write } => commands::show_config(&config, &path, write),
    }
}
