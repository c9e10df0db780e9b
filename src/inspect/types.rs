//! Type definitions for the inspection engine.
//!
//! - [`Severity`] - problem severity levels (Info, Warning, Error)
//! - [`CheckKind`] - the built-in checks and their IDs
//! - [`Problem`] - one reported finding with anchor and suggested fixes
//! - [`InspectionReport`] - complete results of a project run

use compact_str::CompactString;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{fix::Fix, syntax::NodeId};

/// Severity level of a reported problem.
///
/// Ordered from lowest to highest severity for sorting purposes. The
/// process exit code is determined by the highest severity found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Informational, does not affect exit code
    Info,
    /// Likely problem (exit code 1)
    Warning,
    /// Must be addressed (exit code 2)
    Error
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// The built-in checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckKind {
    /// A bound parameter has no matching placeholder in the SQL
    MissingPlaceholder,
    /// Placeholders in the SQL are never bound at the call site
    MissingPlaceholdersInParams,
    /// A `companyId` binding on a single-tenant call
    RedundantCompanyId,
    /// The referenced `.sql` resource cannot be resolved
    SqlFileMissing
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::MissingPlaceholder,
        CheckKind::MissingPlaceholdersInParams,
        CheckKind::RedundantCompanyId,
        CheckKind::SqlFileMissing
    ];

    /// Stable check identifier used in configuration and output.
    pub fn id(self) -> &'static str {
        match self {
            Self::MissingPlaceholder => "SP001",
            Self::MissingPlaceholdersInParams => "SP002",
            Self::RedundantCompanyId => "SP003",
            Self::SqlFileMissing => "SP004"
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Self::SqlFileMissing => Severity::Error,
            _ => Severity::Warning
        }
    }
}

/// A single finding reported against a call site.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    /// Stable check identifier (e.g. "SP001")
    pub check_id: &'static str,
    pub kind:     CheckKind,
    pub message:  String,
    pub severity: Severity,
    /// Path of the containing file
    pub file:     CompactString,
    /// Node the problem is anchored at; always a node of the file's tree
    /// at report time
    pub anchor:   NodeId,
    /// Suggested quick fixes, possibly empty
    pub fixes:    SmallVec<[Fix; 2]>
}

impl Problem {
    pub fn new(kind: CheckKind, message: String, anchor: NodeId) -> Self {
        Self {
            check_id: kind.id(),
            kind,
            message,
            severity: kind.default_severity(),
            file: CompactString::default(),
            anchor,
            fixes: SmallVec::new()
        }
    }

    pub fn with_fixes(mut self, fixes: impl IntoIterator<Item = Fix>) -> Self {
        self.fixes.extend(fixes);
        self
    }
}

/// Complete results of inspecting a project snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    /// All problems found, sorted by severity then location
    pub problems:    Vec<Problem>,
    /// Number of files visited
    pub files_count: usize
}

impl InspectionReport {
    pub fn new(files_count: usize) -> Self {
        Self {
            problems: Vec::new(),
            files_count
        }
    }

    pub fn add_problem(&mut self, problem: Problem) {
        self.problems.push(problem);
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity == severity)
            .count()
    }
}
