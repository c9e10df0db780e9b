use colored::Colorize;

use crate::inspect::{InspectionReport, Problem, Severity};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Format an inspection report based on output options
pub fn format_report(report: &InspectionReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => format_text_report(report, opts)
    }
}

fn format_text_report(report: &InspectionReport, opts: &OutputOptions) -> String {
    let mut out = String::new();

    if report.problems.is_empty() {
        let message = format!(
            "No problems found in {} file(s).\n",
            report.files_count
        );
        if opts.colored {
            out.push_str(&message.green().to_string());
        } else {
            out.push_str(&message);
        }
        return out;
    }

    let mut current_file: Option<&str> = None;
    for problem in &report.problems {
        if current_file != Some(problem.file.as_str()) {
            if current_file.is_some() {
                out.push('\n');
            }
            let header = format!("{}:", problem.file);
            if opts.colored {
                out.push_str(&header.cyan().bold().to_string());
            } else {
                out.push_str(&header);
            }
            out.push('\n');
            current_file = Some(problem.file.as_str());
        }
        out.push_str(&format_problem_line(problem, opts));
        if opts.verbose {
            for fix in &problem.fixes {
                out.push_str(&format!("      fix: {}\n", fix.label));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{} problem(s) in {} file(s): {} error(s), {} warning(s), {} info\n",
        report.problems.len(),
        report.files_count,
        report.error_count(),
        report.warning_count(),
        report.info_count()
    ));
    out
}

fn format_problem_line(problem: &Problem, opts: &OutputOptions) -> String {
    let tag = format!("[{}]", problem.severity);
    let tag = if opts.colored {
        match problem.severity {
            Severity::Error => tag.red().bold().to_string(),
            Severity::Warning => tag.yellow().to_string(),
            Severity::Info => tag.blue().to_string()
        }
    } else {
        tag
    };
    // Multi-line messages (unbound placeholder lists) get their
    // continuation lines indented under the tag.
    let message = problem.message.replace('\n', "\n      ");
    format!("  {} {} {}\n", tag, problem.check_id, message)
}
