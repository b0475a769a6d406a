//! Result records handed back to the caller, and their renderings.

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{CriteriaField, TidyError};

/// What a run removed, or would remove in check mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TidyReport {
    pub deleted_files: Vec<PathBuf>,
    pub deleted_dirs: Vec<PathBuf>,
    pub changed: bool,
}

impl TidyReport {
    pub fn new(deleted_files: Vec<PathBuf>, deleted_dirs: Vec<PathBuf>) -> Self {
        let changed = !deleted_files.is_empty() || !deleted_dirs.is_empty();
        TidyReport {
            deleted_files,
            deleted_dirs,
            changed,
        }
    }
}

/// A run that stopped early, with everything removed before it stopped.
#[derive(Debug)]
pub struct TidyFailure {
    pub report: TidyReport,
    pub error: TidyError,
}

impl TidyFailure {
    pub fn new(report: TidyReport, error: TidyError) -> Self {
        TidyFailure { report, error }
    }

    /// Serializable form of this failure.
    pub fn record(&self) -> FailureRecord<'_> {
        let mut record = FailureRecord {
            failed: true,
            deleted_files: &self.report.deleted_files,
            deleted_dirs: &self.report.deleted_dirs,
            path: self.error.path().cloned(),
            age: None,
            size: None,
            matches: None,
            msg: self.error.to_string(),
        };

        match &self.error {
            TidyError::InvalidCriteria { field, value } => match field {
                CriteriaField::Age => record.age = Some(value.clone()),
                CriteriaField::Size => record.size = Some(value.clone()),
            },
            TidyError::InvalidPattern { pattern, .. } => record.matches = Some(pattern.clone()),
            TidyError::Deletion { .. } => {}
        }

        record
    }
}

impl From<TidyError> for TidyFailure {
    fn from(error: TidyError) -> Self {
        TidyFailure::new(TidyReport::default(), error)
    }
}

impl fmt::Display for TidyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for TidyFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Failure record as emitted to the caller.
#[derive(Debug, Serialize)]
pub struct FailureRecord<'a> {
    pub failed: bool,
    pub deleted_files: &'a [PathBuf],
    pub deleted_dirs: &'a [PathBuf],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    pub msg: String,
}

/// Human-readable summary of a successful run.
pub fn render_text(report: &TidyReport, check_mode: bool) -> String {
    let verb = if check_mode { "Would remove" } else { "Removed" };
    let mut out = String::new();

    for path in &report.deleted_files {
        out.push_str(&format!("{} file: {}\n", verb.red(), path.display()));
    }
    for path in &report.deleted_dirs {
        out.push_str(&format!("{} directory: {}\n", verb.red(), path.display()));
    }

    let summary = format!(
        "{} files, {} directories",
        report.deleted_files.len(),
        report.deleted_dirs.len()
    );
    if report.changed {
        out.push_str(&format!("{}\n", summary.bold()));
    } else {
        out.push_str(&format!("{}\n", "Nothing to tidy.".green()));
    }
    if check_mode {
        out.push_str("Check mode: no files were deleted.\n");
    }

    out
}

/// Human-readable description of a failed run.
pub fn render_failure_text(failure: &TidyFailure) -> String {
    let mut out = render_text(&failure.report, false);
    let target = failure
        .error
        .path()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default();
    out.push_str(&format!("{}{}\n", failure.error.to_string().bold().red(), target));
    out
}
