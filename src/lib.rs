//! Tidy - Criteria-Based File Cleanup
//!
//! Tidy removes files, and optionally directories, below a path when they
//! match every given criterion: a minimum age measured on a chosen timestamp,
//! a minimum size, and one of a set of shell glob patterns on the basename.
//! It is meant to be invoked over and over by an orchestration system, so each
//! run recomputes what matches and reports whether anything changed.
//!
//! ## Pipeline
//!
//! 1. [`criteria`] turns raw "2d" / "10m" strings into seconds and bytes
//! 2. [`filters`] holds the name, age and size predicates
//! 3. [`selector`] walks the target and collects sorted candidates
//! 4. [`deleter`] removes them, or only reports them in check mode
//!
//! [`run()`] strings the stages together and returns either a [`TidyReport`]
//! or a [`TidyFailure`] carrying the partial report.

pub mod criteria;
pub mod deleter;
pub mod error;
pub mod filters;
pub mod params;
pub mod report;
pub mod run;
pub mod selector;

// Re-export commonly used items
pub use criteria::{parse_age, parse_size, Criteria};
pub use deleter::RemovalOutcome;
pub use error::{CriteriaField, TidyError};
pub use filters::{age_matches, name_matches, size_matches, Timestamps};
pub use params::{TidyParams, TimestampKind};
pub use report::{FailureRecord, TidyFailure, TidyReport};
pub use run::run;
pub use selector::{select, Candidate, Candidates, EntryKind};
