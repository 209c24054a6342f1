//! Fail-fast checks run before a flow network is built.
//!
//! Node addresses are derived from referee and match ids, so ids must form
//! the dense ranges `0..R` and `0..M`. Day indices must fall inside the
//! horizon. The first violation found is returned; nothing is partially
//! accepted.

use tracing::instrument;

use crate::error::ValidationError;
use crate::model::{Day, Match, Problem, Referee};

/// Validate a full query.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking `days`, then
/// referees, then matches.
#[instrument(skip_all, fields(referees = referees.len(), matches = matches.len(), days = days))]
pub fn validate(referees: &[Referee], matches: &[Match], days: Day) -> Result<(), ValidationError> {
    if days == 0 {
        return Err(ValidationError::NoDays);
    }
    validate_referees(referees, days)?;
    validate_matches(matches, days)
}

/// [`validate`] over a [`Problem`] bundle.
///
/// # Errors
///
/// See [`validate`].
pub fn validate_problem(problem: &Problem) -> Result<(), ValidationError> {
    validate(&problem.referees, &problem.matches, problem.days)
}

fn validate_referees(referees: &[Referee], days: Day) -> Result<(), ValidationError> {
    let count = referees.len();
    let mut seen = vec![false; count];
    for referee in referees {
        let id = referee.id;
        let Some(slot) = seen.get_mut(id) else {
            return Err(ValidationError::RefereeIdOutOfRange { id, count });
        };
        if *slot {
            return Err(ValidationError::DuplicateRefereeId { id });
        }
        *slot = true;

        if let Some(entry) = referee.availability.iter().find(|entry| entry.day >= days) {
            return Err(ValidationError::AvailabilityDayOutOfRange {
                referee_id: id,
                day: entry.day,
                days,
            });
        }
    }
    Ok(())
}

fn validate_matches(matches: &[Match], days: Day) -> Result<(), ValidationError> {
    let count = matches.len();
    let mut seen = vec![false; count];
    for m in matches {
        let id = m.id();
        let Some(slot) = seen.get_mut(id) else {
            return Err(ValidationError::MatchIdOutOfRange { id, count });
        };
        if *slot {
            return Err(ValidationError::DuplicateMatchId { id });
        }
        *slot = true;

        if m.day() >= days {
            return Err(ValidationError::MatchDayOutOfRange {
                match_id: id,
                day: m.day(),
                days,
            });
        }
    }
    Ok(())
}
