//! # SQL Param Lint
//!
//! Static analysis of SQL placeholder bindings in fluent database call
//! chains.
//!
//! `sql-param-lint` inspects call sites that execute SQL loaded from
//! `.sql` resource files (`statement`, `sql`, `sqlNoLogging`, ...),
//! extracts the `:name` placeholders declared in the SQL text, and
//! cross-checks them against the `param`/`paramNull`/`paramArray`
//! bindings supplied on the call chain.
//!
//! # Checks
//!
//! | ID | Name | Description |
//! |----|------|-------------|
//! | SP001 | Missing placeholder | A bound parameter has no matching placeholder in the SQL |
//! | SP002 | Unbound placeholders | Placeholders in the SQL are never bound at the call site |
//! | SP003 | Redundant companyId | A `companyId` binding on a call already scoped to one tenant |
//! | SP004 | Missing SQL file | The referenced `.sql` resource cannot be resolved |
//!
//! # Quick Start
//!
//! ```bash
//! # Inspect a project snapshot exported by a host front end
//! sql-param-lint check -p project.json
//!
//! # Structured output for CI
//! sql-param-lint check -p project.json -f json > problems.json
//!
//! # Stream the snapshot from stdin
//! exporter | sql-param-lint check -p -
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [checks]
//! disabled = ["SP003"]
//!
//! [checks.severity]
//! SP001 = "error"
//! ```
//!
//! # Exit Codes
//!
//! - `0` - no issues or only informational messages
//! - `1` - warnings found
//! - `2` - errors found

use std::{
    fs::read_to_string,
    io::{self, Read},
    process
};

use clap::Parser;
use sql_param_lint::{
    cli::{Cli, Commands, Format},
    config::Config,
    error::{AppResult, file_read_error},
    inspect::{Runner, Severity},
    output::{OutputFormat, OutputOptions, format_report},
    project::{Project, ProjectIndex}
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            // AppError's Display is only the kind; the detail lives in
            // the message payload.
            match e.message.as_deref() {
                Some(detail) => eprintln!("Error: {}", detail),
                None => eprintln!("Error: {}", e)
            }
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Check {
            project,
            output_format,
            verbose,
            no_color
        } => {
            // Support stdin for the snapshot with "-"
            let snapshot = if project.to_str() == Some("-") {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(|e| file_read_error("stdin", e))?;
                buffer
            } else {
                read_to_string(&project)
                    .map_err(|e| file_read_error(&project.display().to_string(), e))?
            };

            let index = ProjectIndex::new(Project::from_json(&snapshot)?);

            let output_opts = OutputOptions {
                format: match output_format {
                    Format::Text => OutputFormat::Text,
                    Format::Json => OutputFormat::Json,
                    Format::Yaml => OutputFormat::Yaml
                },
                colored: !no_color,
                verbose
            };

            let runner = Runner::with_config(&config.checks);
            let report = runner.inspect(&index);
            println!("{}", format_report(&report, &output_opts));

            let exit_code = if report
                .problems
                .iter()
                .any(|p| p.severity == Severity::Error)
            {
                2
            } else if report
                .problems
                .iter()
                .any(|p| p.severity == Severity::Warning)
            {
                1
            } else {
                0
            };

            Ok(exit_code)
        }
    }
}
