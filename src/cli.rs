use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Param Lint - check SQL placeholder bindings in fluent call chains
#[derive(Parser, Debug)]
#[command(name = "sql-param-lint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect a project snapshot for placeholder/parameter mismatches
    Check {
        /// Path to the project snapshot JSON (use - for stdin)
        #[arg(short, long)]
        project: PathBuf,

        /// Output format
        #[arg(
            short = 'f',
            long,
            value_enum,
            env = "SQL_PARAM_LINT_FORMAT",
            default_value = "text"
        )]
        output_format: Format,

        /// Show suggested quick fixes for each problem
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
