//! Date-range admission rules shared by every season/harvest/employee/workday
//! consistency check.
//!
//! Two call sites exist with different failure shapes: season-containment
//! checks during create/update raise immediately ([`check_in_season`]), while
//! cross-entity compatibility checks during linking want a boolean
//! ([`in_bounds`]). Both apply the same four rules, in order:
//!
//! 1. bounds closed, candidate closed: `bs <= cs <= ce <= be`
//! 2. bounds closed, candidate open:   `bs <= cs <= be`
//! 3. bounds open, candidate closed:   `bs <= cs <= ce`
//! 4. bounds open, candidate open:     `bs <= cs`

use crate::error::CoreError;
use crate::types::Date;

/// Decide whether a candidate date (or range) falls inside the given bounds.
pub fn in_bounds(
    candidate_start: Date,
    bounds_start: Date,
    candidate_end: Option<Date>,
    bounds_end: Option<Date>,
) -> bool {
    match (candidate_end, bounds_end) {
        (Some(ce), Some(be)) => {
            bounds_start <= candidate_start && candidate_start <= ce && ce <= be
        }
        (None, Some(be)) => bounds_start <= candidate_start && candidate_start <= be,
        (Some(ce), None) => bounds_start <= candidate_start && candidate_start <= ce,
        (None, None) => bounds_start <= candidate_start,
    }
}

/// Raising form of [`in_bounds`] for season-containment checks.
///
/// `entity` names the candidate in the error detail ("Harvest", "Employee",
/// "Expense"), matching the messages the original surface produced.
pub fn check_in_season(
    entity: &str,
    candidate_start: Date,
    candidate_end: Option<Date>,
    season_start: Date,
    season_end: Option<Date>,
) -> Result<(), CoreError> {
    if in_bounds(candidate_start, season_start, candidate_end, season_end) {
        return Ok(());
    }
    let detail = match (candidate_end, season_end) {
        (Some(_), Some(se)) => format!(
            "{entity} start and end dates have to be between season start and end: {season_start}:{se}"
        ),
        (None, Some(se)) => format!(
            "{entity} date has to be between season start and end: {season_start}:{se}"
        ),
        (Some(ce), None) => format!(
            "{entity} start date must not be after its end date {ce}, and neither may precede season start: {season_start}"
        ),
        (None, None) => format!("{entity} date can't be before season start date: {season_start}"),
    };
    Err(CoreError::Validation(detail))
}
