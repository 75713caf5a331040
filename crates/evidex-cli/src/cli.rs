use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Evidence sufficiency and citation checks for clinical answers
#[derive(Parser)]
#[command(name = "evidex", version, about, long_about = None)]
pub struct Cli {
    /// Config file (overrides $EVIDEX_CONFIG and the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tag a query and score, filter and rank an evidence package
    Assess {
        /// The clinical question
        #[arg(long, short)]
        query: String,

        /// Evidence package JSON (category name → list of items)
        #[arg(long, short)]
        evidence: Option<PathBuf>,

        /// Generated answer to validate against the ranked references
        #[arg(long, short)]
        answer: Option<PathBuf>,
    },

    /// Validate an answer's citations against the references it was shown
    Validate {
        /// The `slots` list printed by `assess`, or a package taken as supplied
        #[arg(long, short)]
        evidence: PathBuf,

        #[arg(long, short)]
        answer: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        write: bool,
    },
}
