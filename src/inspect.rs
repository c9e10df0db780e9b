//! The placeholder/parameter inspection engine.
//!
//! ```text
//! ┌──────────────┐     ┌───────────┐     ┌──────────────────┐
//! │ ProjectIndex │────▶│  Runner   │────▶│ InspectionReport │
//! └──────────────┘     └───────────┘     └──────────────────┘
//!                            │
//!                     ┌──────┴──────┐
//!                     │  Inspector  │  one per file, rayon-parallel
//!                     └─────────────┘
//! ```
//!
//! For every call expression of a visited file the [`Inspector`] gates on
//! [`parsable_sql`], loads the referenced `.sql` resource through the
//! injected [`SqlResolver`], tokenizes it into placeholders, classifies
//! the site's tenancy, and reconciles bindings against placeholders. The
//! [`Runner`] executes files in parallel, applies configured disable
//! lists and severity overrides, and sorts the report.
//!
//! # Checks
//!
//! | ID | Finding |
//! |----|---------|
//! | SP001 | Bound parameter without a matching placeholder |
//! | SP002 | Placeholders never bound at the call site |
//! | SP003 | Redundant `companyId` binding on a single-tenant call |
//! | SP004 | Referenced `.sql` resource does not exist |
//!
//! Checks can be disabled or re-levelled via [`ChecksConfig`]:
//!
//! ```toml
//! [checks]
//! disabled = ["SP003"]
//!
//! [checks.severity]
//! SP001 = "error"
//! ```

mod bindings;
mod tenancy;
mod types;

use std::{
    collections::HashMap,
    sync::{
        LazyLock,
        atomic::{AtomicBool, Ordering}
    }
};

pub use bindings::{COMPANY_ID_PARAM, PARAM_METHODS, reconcile};
use rayon::prelude::*;
use regex::Regex;
pub use tenancy::TenancyClassifier;
pub use types::{CheckKind, InspectionReport, Problem, Severity};

use crate::{
    config::ChecksConfig,
    error::{AppResult, cancelled},
    project::{FileId, ProjectIndex, SourceFile, SqlResolver},
    sql,
    syntax::{NodeId, NodeKind, SyntaxTree}
};

/// Method names that execute SQL loaded from a resource file.
pub const SQL_ENTRY_POINTS: [&str; 5] = ["statement", "statements", "sql", "sqls", "sqlNoLogging"];

/// A resource path must be quoted and contain at least one separator.
static SQL_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^"]+/[^/]+$"#).expect("path filter is a valid regex"));

/// Whether a call expression is an analyzable SQL call site.
///
/// Batch-update variants are excluded entirely: their parameters are
/// supplied per row and cannot be checked statically.
pub fn parsable_sql(tree: &SyntaxTree, call: NodeId) -> bool {
    if let Some(parent) = tree.parent(call)
        && tree.kind(parent) == NodeKind::Reference
        && tree.name(parent).starts_with("batchUpdate")
    {
        return false;
    }
    let Some(method) = tree.method_name(call) else {
        return false;
    };
    if !SQL_ENTRY_POINTS.contains(&method) {
        return false;
    }
    match tree.string_argument(call, 0) {
        Some(path) => SQL_PATH_RE.is_match(path),
        None => false
    }
}

/// Per-file analysis driver.
///
/// Holds only shared read-only state, so independent files can be
/// inspected concurrently.
pub struct Inspector<'a> {
    index:  &'a ProjectIndex,
    cancel: Option<&'a AtomicBool>
}

impl<'a> Inspector<'a> {
    pub fn new(index: &'a ProjectIndex) -> Self {
        Self {
            index,
            cancel: None
        }
    }

    /// Install a host cancel flag, checked between call sites.
    pub fn with_cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Inspect every SQL call site of one file.
    pub fn inspect_file(&self, file_id: FileId) -> AppResult<Vec<Problem>> {
        let file = self.index.file(file_id);
        let mut problems = Vec::new();
        for call in file.tree.calls() {
            if let Some(cancel) = self.cancel
                && cancel.load(Ordering::Relaxed)
            {
                return Err(cancelled());
            }
            self.inspect_call(file_id, file, call, &mut problems);
        }
        for problem in &mut problems {
            problem.file = file.path.as_str().into();
        }
        Ok(problems)
    }

    fn inspect_call(
        &self,
        file_id: FileId,
        file: &SourceFile,
        call: NodeId,
        problems: &mut Vec<Problem>
    ) {
        let tree = &file.tree;
        if !parsable_sql(tree, call) {
            return;
        }
        // parsable_sql guarantees a literal path argument
        let Some(path) = tree.string_argument(call, 0) else {
            return;
        };

        let mut text = self.index.resolve_sql(&file.module, path, "main");
        if text.is_none() && file.is_test() {
            text = self.index.resolve_sql(&file.module, path, "test");
        }
        let Some(text) = text else {
            let anchor = tree
                .argument_at(call, 0)
                .unwrap_or(call);
            problems.push(Problem::new(
                CheckKind::SqlFileMissing,
                "Sql file does not exists".to_string(),
                anchor
            ));
            return;
        };

        let placeholders = sql::placeholders(text);
        let single_tenant = TenancyClassifier::new(self.index).is_single_tenant(file_id, call);
        problems.extend(reconcile(tree, call, placeholders, single_tenant));
    }
}

/// Project-wide execution engine.
///
/// Files are inspected in parallel with [`rayon`]; results are filtered
/// by the configured disable list, adjusted by severity overrides, and
/// sorted errors-first.
pub struct Runner {
    disabled:       Vec<String>,
    severity_cache: HashMap<&'static str, Severity>
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::with_config(&ChecksConfig::default())
    }

    pub fn with_config(config: &ChecksConfig) -> Self {
        let mut severity_cache = HashMap::new();
        for kind in CheckKind::ALL {
            if let Some(sev_str) = config.severity.get(kind.id())
                && let Some(sev) = parse_severity(sev_str)
            {
                severity_cache.insert(kind.id(), sev);
            }
        }
        Self {
            disabled: config.disabled.clone(),
            severity_cache
        }
    }

    /// Inspect the whole project snapshot.
    pub fn inspect(&self, index: &ProjectIndex) -> InspectionReport {
        let file_ids: Vec<FileId> = index.file_ids().collect();
        let mut report = InspectionReport::new(file_ids.len());

        // No cancel flag on the batch path, so inspect_file cannot fail
        let problems: Vec<Problem> = file_ids
            .par_iter()
            .flat_map(|&id| Inspector::new(index).inspect_file(id).unwrap_or_default())
            .collect();

        for mut problem in problems {
            if self
                .disabled
                .iter()
                .any(|d| d.eq_ignore_ascii_case(problem.check_id))
            {
                continue;
            }
            if let Some(&severity) = self.severity_cache.get(problem.check_id) {
                problem.severity = severity;
            }
            report.add_problem(problem);
        }

        report.problems.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.anchor.0.cmp(&b.anchor.0))
        });

        report
    }
}

/// Parse severity string to enum
fn parse_severity(s: &str) -> Option<Severity> {
    match s.to_lowercase().as_str() {
        "error" => Some(Severity::Error),
        "warning" | "warn" => Some(Severity::Warning),
        "info" => Some(Severity::Info),
        _ => None
    }
}
