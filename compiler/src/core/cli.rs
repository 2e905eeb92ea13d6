use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DIALECT};
use crate::dialect::Dialect;

#[derive(Parser)]
#[command(name = "filterql")]
#[command(version, about = "Compile filter trees into parameterized query fragments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target dialect (sqlserver, mysql, postgres, sqlite, oracle, linq)
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

/// Parse dialect from CLI/env string
fn parse_dialect(s: &str) -> Result<Dialect, String> {
    s.parse()
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a JSON filter document and print the fragment and parameters
    Compile {
        /// Filter document path, or - for stdin
        #[arg(long, short = 'i', default_value = "-")]
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List supported dialects
    Dialects,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dialect: Option<Dialect>,
    pub config: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        dialect: cli.dialect,
        config: cli.config,
    };
    (config, cli.command)
}
