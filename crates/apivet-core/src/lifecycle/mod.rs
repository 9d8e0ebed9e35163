//! Stability lifecycle policy.
//!
//! Resource versions carry a stability level that may only evolve along a
//! fixed state machine:
//!
//! ```text
//!           ┌──────────────► experimental ──┐
//!           │                               │
//!   wip ────┼──────────────► beta ──────────┼──► removed
//!           │                               │
//!           └──────────────► ga ────────────┘
//! ```
//!
//! `wip` may move to anything; every other level is sticky — once promoted,
//! the only way out is removal, which is gated by the [`sunset`] policy.
//! Self-loops (no-op revisions) are allowed on every state, and `removed` is
//! terminal for that resource version: a new version at a later date is a new
//! entity, not a transition.

pub mod sunset;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle maturity level of a resource version.
///
/// Ordered by maturity: `wip < experimental < beta < ga`. The ordering uses
/// an explicit rank mapping, not the enum ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    /// Work in progress; may be changed or deleted freely.
    Wip,
    /// Published for early feedback; breaking changes allowed.
    Experimental,
    /// Stabilizing; breaking changes require versioning.
    Beta,
    /// Generally available.
    Ga,
}

impl Stability {
    /// All stability levels in ascending maturity order.
    pub const ALL: [Self; 4] = [Self::Wip, Self::Experimental, Self::Beta, Self::Ga];

    /// Returns the stability as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wip => "wip",
            Self::Experimental => "experimental",
            Self::Beta => "beta",
            Self::Ga => "ga",
        }
    }

    /// Numeric maturity rank, `wip -> 0` through `ga -> 3`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Wip => 0,
            Self::Experimental => 1,
            Self::Beta => 2,
            Self::Ga => 3,
        }
    }

    /// Whether breaking changes are allowed at this stability without
    /// versioning or sunset notice.
    #[must_use]
    pub const fn allows_breaking_changes(self) -> bool {
        matches!(self, Self::Wip | Self::Experimental)
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stability {
    type Err = StabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wip" => Ok(Self::Wip),
            "experimental" => Ok(Self::Experimental),
            "beta" => Ok(Self::Beta),
            "ga" => Ok(Self::Ga),
            other => Err(StabilityError::Invalid(other.to_string())),
        }
    }
}

impl PartialOrd for Stability {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stability {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Errors raised when parsing a stability level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StabilityError {
    /// The string is not a recognized stability level.
    #[error("invalid stability '{0}', must be one of wip, experimental, beta, ga")]
    Invalid(String),
}

/// Whether a string names a valid stability level.
#[must_use]
pub fn is_valid_stability(s: &str) -> bool {
    Stability::from_str(s).is_ok()
}

/// Whether a stability transition is allowed.
///
/// Allowed when `before` is absent (a new resource version may start at any
/// level), `after` is absent (removal is governed by the sunset policy, not
/// here), the level is unchanged, or `before` is `wip`. Any other pair is
/// forbidden: stability is sticky once promoted past `wip`.
#[must_use]
pub fn is_allowed_transition(before: Option<Stability>, after: Option<Stability>) -> bool {
    match (before, after) {
        (None, _) | (_, None) | (Some(Stability::Wip), Some(_)) => true,
        (Some(before), Some(after)) => before == after,
    }
}
