//! Removes selected candidates and records the outcome.

use std::fs;
use std::io;
use std::path::Path;

use crate::criteria::Criteria;
use crate::error::TidyError;
use crate::report::{TidyFailure, TidyReport};
use crate::selector::{Candidate, Candidates, EntryKind};

/// Result of a single removal attempt.
#[derive(Debug)]
pub enum RemovalOutcome {
    Removed,
    /// Left in place on purpose (already gone, or non-empty without force)
    Skipped,
    Failed(io::Error),
}

/// Report the candidates as if they had been removed, touching nothing.
pub fn check(candidates: Candidates) -> TidyReport {
    TidyReport::new(
        candidates.files.into_iter().map(|c| c.path).collect(),
        candidates.dirs.into_iter().map(|c| c.path).collect(),
    )
}

/// Remove the candidates in order: every file, then every directory.
///
/// In silent mode failed removals are skipped; otherwise the first failure
/// ends the run and is returned together with whatever was already removed.
pub fn delete(candidates: Candidates, criteria: &Criteria) -> Result<TidyReport, TidyFailure> {
    let mut report = TidyReport::default();

    for candidate in candidates.files {
        let outcome = remove_file(&candidate.path);
        record(&mut report, candidate, outcome, criteria.silent())?;
    }

    for candidate in candidates.dirs {
        let outcome = remove_dir(&candidate.path, criteria.force());
        record(&mut report, candidate, outcome, criteria.silent())?;
    }

    report.changed = !report.deleted_files.is_empty() || !report.deleted_dirs.is_empty();
    Ok(report)
}

fn record(
    report: &mut TidyReport,
    candidate: Candidate,
    outcome: RemovalOutcome,
    silent: bool,
) -> Result<(), TidyFailure> {
    match outcome {
        RemovalOutcome::Removed => {
            log::info!("Removed {}: {}", candidate.kind, candidate.path.display());
            match candidate.kind {
                EntryKind::File => report.deleted_files.push(candidate.path),
                EntryKind::Directory => report.deleted_dirs.push(candidate.path),
            }
            Ok(())
        }
        RemovalOutcome::Skipped => {
            log::debug!("Left {} in place: {}", candidate.kind, candidate.path.display());
            Ok(())
        }
        RemovalOutcome::Failed(err) if silent => {
            log::debug!(
                "Ignoring failure to remove {}: {}",
                candidate.path.display(),
                err
            );
            Ok(())
        }
        RemovalOutcome::Failed(source) => {
            let error = TidyError::Deletion {
                kind: candidate.kind,
                path: candidate.path,
                source,
            };
            let mut partial = std::mem::take(report);
            partial.changed = !partial.deleted_files.is_empty() || !partial.deleted_dirs.is_empty();
            Err(TidyFailure::new(partial, error))
        }
    }
}

fn remove_file(path: &Path) -> RemovalOutcome {
    match fs::remove_file(path) {
        Ok(()) => RemovalOutcome::Removed,
        Err(err) => RemovalOutcome::Failed(err),
    }
}

fn remove_dir(path: &Path, force: bool) -> RemovalOutcome {
    // An earlier forced removal in this pass may already have taken it.
    if !path.exists() {
        return RemovalOutcome::Skipped;
    }

    match try_remove_dir(path, force) {
        Ok(true) => RemovalOutcome::Removed,
        Ok(false) => RemovalOutcome::Skipped,
        Err(err) => RemovalOutcome::Failed(err),
    }
}

fn try_remove_dir(path: &Path, force: bool) -> io::Result<bool> {
    if !force && !is_empty_dir(path)? {
        return Ok(false);
    }

    if fs::symlink_metadata(path)?.file_type().is_symlink() {
        // Unlink the link itself, never the tree it points at.
        fs::remove_file(path)?;
    } else {
        fs::remove_dir_all(path)?;
    }
    Ok(true)
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
