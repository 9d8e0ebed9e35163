//! Sunset (deprecation notice) policy.
//!
//! A non-`wip` resource version may only be removed after it has been
//! deprecated by a successor and the stability-dependent notice period has
//! elapsed between the version's date and the removal date.
//!
//! `wip` versions may be deleted freely and deliberately have no entry in the
//! schedule: looking one up is an [`SunsetError::UnexpectedStability`] error
//! at the call site, not a zero-day notice period.

use chrono::NaiveDate;
use thiserror::Error;

use super::Stability;
use crate::context::ResourceVersions;

/// Notice period in days required before a deprecated version may be
/// removed, keyed by stability.
pub const SUNSET_SCHEDULE: &[(Stability, u32)] = &[
    (Stability::Experimental, 30),
    (Stability::Beta, 90),
    (Stability::Ga, 180),
];

/// The notice period for a stability level, if the schedule has one.
#[must_use]
pub fn required_notice_days(stability: Stability) -> Option<u32> {
    SUNSET_SCHEDULE
        .iter()
        .find(|(level, _)| *level == stability)
        .map(|(_, days)| *days)
}

/// Errors raised when a removal does not satisfy the sunset policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SunsetError {
    /// The version has no `deprecatedBy` successor recorded.
    #[error("expected {resource} to be deprecated before removing")]
    NotDeprecated {
        /// The resource being removed.
        resource: String,
    },

    /// The stability has no entry in the sunset schedule.
    #[error("unexpected stability {stability} in {resource}")]
    UnexpectedStability {
        /// The resource being removed.
        resource: String,
        /// The stability with no schedule entry.
        stability: Stability,
    },

    /// The version was deprecated, but not long enough ago.
    #[error(
        "expected {stability} resource {resource} to be deprecated {required_days} days, \
         found {elapsed_days}"
    )]
    NoticePeriodNotMet {
        /// The resource being removed.
        resource: String,
        /// The stability of the removed version.
        stability: Stability,
        /// Days of notice the schedule requires.
        required_days: u32,
        /// Days actually elapsed between the version date and the change.
        elapsed_days: i64,
    },
}

/// Checks whether removing `resource`'s version at `version_date` with the
/// given `stability` on `change_date` satisfies the sunset policy.
///
/// The version must have a `deprecatedBy` successor recorded under the exact
/// (resource, date, stability) key, and at least
/// [`required_notice_days`] must have elapsed between `version_date` and
/// `change_date`.
///
/// # Errors
///
/// - [`SunsetError::NotDeprecated`] when no successor is recorded.
/// - [`SunsetError::UnexpectedStability`] when the stability has no schedule
///   entry (`wip` versions are removable without notice and should not be
///   checked here).
/// - [`SunsetError::NoticePeriodNotMet`] when the notice period is short.
pub fn check_sunset(
    versions: &ResourceVersions,
    resource: &str,
    version_date: NaiveDate,
    stability: Stability,
    change_date: NaiveDate,
) -> Result<(), SunsetError> {
    if versions
        .deprecated_by(resource, version_date, stability)
        .is_none()
    {
        return Err(SunsetError::NotDeprecated {
            resource: resource.to_string(),
        });
    }

    let Some(required_days) = required_notice_days(stability) else {
        return Err(SunsetError::UnexpectedStability {
            resource: resource.to_string(),
            stability,
        });
    };

    let elapsed_days = change_date.signed_duration_since(version_date).num_days();
    if elapsed_days < i64::from(required_days) {
        return Err(SunsetError::NoticePeriodNotMet {
            resource: resource.to_string(),
            stability,
            required_days,
            elapsed_days,
        });
    }

    Ok(())
}
