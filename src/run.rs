//! One tidy run: parse, select, then report or delete.

use crate::criteria::Criteria;
use crate::deleter::{check, delete};
use crate::params::TidyParams;
use crate::report::{TidyFailure, TidyReport};
use crate::selector::select;

/// Run the whole pipeline for `params`.
///
/// Every call recomputes the candidate set from the current state of the
/// filesystem, so repeating a run after it succeeded reports no change.
pub fn run(params: &TidyParams) -> Result<TidyReport, TidyFailure> {
    log::debug!("Parsing criteria for {}", params.path.display());
    let criteria = Criteria::from_params(params)?;

    log::debug!("Selecting candidates under {}", params.path.display());
    let candidates = select(&params.path, &criteria);
    log::debug!(
        "Selected {} files and {} directories",
        candidates.files.len(),
        candidates.dirs.len()
    );

    if params.check_mode {
        log::debug!("Check mode: reporting candidates only");
        return Ok(check(candidates));
    }

    let outcome = delete(candidates, &criteria);
    match &outcome {
        Ok(report) => log::debug!(
            "Done: removed {} files and {} directories",
            report.deleted_files.len(),
            report.deleted_dirs.len()
        ),
        Err(failure) => log::error!("Tidy failed: {}", failure),
    }
    outcome
}
