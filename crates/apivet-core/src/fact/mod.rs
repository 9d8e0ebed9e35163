//! The fact/change model: the external data contract of the engine.
//!
//! A [`Fact`] is one versioned element of an API description — an operation,
//! a parameter, a response, a body property, or the document itself — with a
//! [`ChangeKind`] and before/after payloads. Facts are produced by an
//! external document-diff collaborator; the engine only consumes them.
//!
//! # Payload Invariant
//!
//! Exactly one payload shape is valid per change kind:
//!
//! | Change | `before` | `after` |
//! |--------|----------|---------|
//! | `added` | absent | present |
//! | `removed` | present | absent |
//! | `changed` | present | present |
//! | `unchanged` | present | present |
//!
//! [`Fact::validate`] enforces this; the runner rejects a fact list that
//! breaks it before any rule runs.

mod location;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use location::{BodyAnchor, FactKind, Location, OperationLocation};

/// How an element changed between the two description versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only in the after version.
    Added,
    /// Present in both versions with a different payload.
    Changed,
    /// Present only in the before version.
    Removed,
    /// Present in both versions with an identical payload.
    Unchanged,
}

impl ChangeKind {
    /// Returns the change kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Removed => "removed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a fact breaks the payload invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactError {
    /// The payloads present do not match the change kind.
    #[error("{change} fact at {location} must carry {expected}")]
    PayloadShape {
        /// Rendered location of the offending fact.
        location: String,
        /// The fact's change kind.
        change: ChangeKind,
        /// Which payloads the change kind requires.
        expected: &'static str,
    },
}

/// One versioned element of an API description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    /// Where the element sits in the description.
    pub location: Location,
    /// How the element changed.
    pub change: ChangeKind,
    /// The element's payload in the before version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// The element's payload in the after version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl Fact {
    /// A fact for an element present only in the after version.
    #[must_use]
    pub fn added(location: Location, after: Value) -> Self {
        Self {
            location,
            change: ChangeKind::Added,
            before: None,
            after: Some(after),
        }
    }

    /// A fact for an element whose payload changed between versions.
    #[must_use]
    pub fn changed(location: Location, before: Value, after: Value) -> Self {
        Self {
            location,
            change: ChangeKind::Changed,
            before: Some(before),
            after: Some(after),
        }
    }

    /// A fact for an element present only in the before version.
    #[must_use]
    pub fn removed(location: Location, before: Value) -> Self {
        Self {
            location,
            change: ChangeKind::Removed,
            before: Some(before),
            after: None,
        }
    }

    /// A fact for an element whose payload is identical in both versions.
    #[must_use]
    pub fn unchanged(location: Location, value: Value) -> Self {
        Self {
            location,
            change: ChangeKind::Unchanged,
            before: Some(value.clone()),
            after: Some(value),
        }
    }

    /// The fact kind, derived from the location variant.
    #[must_use]
    pub const fn kind(&self) -> FactKind {
        self.location.kind()
    }

    /// The current payload: `after` when present, otherwise `before`.
    #[must_use]
    pub fn current(&self) -> Option<&Value> {
        self.after.as_ref().or(self.before.as_ref())
    }

    /// Checks the change-kind/payload invariant.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::PayloadShape`] naming the offending fact when the
    /// payloads present do not match the change kind.
    pub fn validate(&self) -> Result<(), FactError> {
        let expected = match self.change {
            ChangeKind::Added => (self.before.is_none() && self.after.is_some())
                .then_some(())
                .ok_or("only an after payload"),
            ChangeKind::Removed => (self.before.is_some() && self.after.is_none())
                .then_some(())
                .ok_or("only a before payload"),
            ChangeKind::Changed | ChangeKind::Unchanged => {
                (self.before.is_some() && self.after.is_some())
                    .then_some(())
                    .ok_or("both a before and an after payload")
            },
        };
        expected.map_err(|expected| FactError::PayloadShape {
            location: self.location.to_string(),
            change: self.change,
            expected,
        })
    }
}
