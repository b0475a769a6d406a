//! Error taxonomy for a tidy run.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::selector::EntryKind;

/// Parameter that failed to parse into criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaField {
    Age,
    Size,
}

impl CriteriaField {
    /// Key used for this field in the parameter and failure records.
    pub fn as_str(self) -> &'static str {
        match self {
            CriteriaField::Age => "age",
            CriteriaField::Size => "size",
        }
    }
}

impl fmt::Display for CriteriaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that stop a tidy run.
#[derive(Error, Debug)]
pub enum TidyError {
    /// Malformed age or size string
    #[error("failed to process {field}")]
    InvalidCriteria { field: CriteriaField, value: String },

    /// Name pattern that is not a valid glob
    #[error("failed to process matches: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A single removal failed outside of silent mode
    #[error("failed to process {kind}: {source}")]
    Deletion {
        kind: EntryKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TidyError {
    /// Path of the entry whose removal failed, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TidyError::Deletion { path, .. } => Some(path),
            _ => None,
        }
    }
}
