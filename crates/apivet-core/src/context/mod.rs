//! Caller-supplied change metadata and the per-fact rule context.
//!
//! The fact-extraction collaborator knows things the fact list itself does
//! not: when the change happens, which resource and version it touches, and
//! how every resource version in the source tree relates to its deprecating
//! successor. That arrives once per run as a [`CustomContext`].
//!
//! For each fact, the runner builds a fresh, read-only [`RuleContext`]
//! combining the fact's location with the custom metadata. Rule predicates
//! and bodies only ever see the context by reference; nothing in it is
//! mutated after construction.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fact::{ChangeKind, Location, OperationLocation};
use crate::lifecycle::Stability;

/// A (date, stability) reference to one resource version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    /// The version's calendar date.
    pub date: NaiveDate,
    /// The version's stability level.
    pub stability: Stability,
}

/// Deprecation state of one resource version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDeprecation {
    /// The version that deprecates this one, if any.
    #[serde(default)]
    pub deprecated_by: Option<VersionRef>,
}

/// Deprecation mapping for every resource version the caller knows about:
/// resource name → version date → stability → deprecation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVersions(
    BTreeMap<String, BTreeMap<NaiveDate, BTreeMap<Stability, VersionDeprecation>>>,
);

impl ResourceVersions {
    /// Records the deprecation state for one (resource, date, stability) key.
    pub fn insert(
        &mut self,
        resource: impl Into<String>,
        date: NaiveDate,
        stability: Stability,
        deprecation: VersionDeprecation,
    ) {
        self.0
            .entry(resource.into())
            .or_default()
            .entry(date)
            .or_default()
            .insert(stability, deprecation);
    }

    /// The deprecating successor for the exact (resource, date, stability)
    /// key, if one is recorded.
    #[must_use]
    pub fn deprecated_by(
        &self,
        resource: &str,
        date: NaiveDate,
        stability: Stability,
    ) -> Option<&VersionRef> {
        self.0
            .get(resource)?
            .get(&date)?
            .get(&stability)?
            .deprecated_by
            .as_ref()
    }
}

/// Change metadata supplied by the caller once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomContext {
    /// When the change did (or would, if proposed) occur.
    pub change_date: NaiveDate,
    /// The resource being changed.
    pub change_resource: String,
    /// The resource version being changed.
    pub change_version: VersionRef,
    /// Deprecation mapping across the whole source tree.
    #[serde(default)]
    pub resource_versions: ResourceVersions,
}

/// Read-only, per-fact view handed to rule predicates and bodies.
///
/// Built fresh for each fact evaluation; request-scoped and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The fact's location.
    pub location: &'a Location,
    /// Change kind of the enclosing operation, when the fact sits inside one
    /// and the fact list contains that operation's own fact. Rules use this
    /// to exempt brand-new operations from change-over-time constraints.
    pub operation_change: Option<ChangeKind>,
    /// The caller-supplied change metadata.
    pub custom: &'a CustomContext,
}

impl<'a> RuleContext<'a> {
    /// The enclosing operation's coordinates, if the location has one.
    #[must_use]
    pub const fn operation(&self) -> Option<&'a OperationLocation> {
        self.location.operation()
    }

    /// Whether the enclosing operation was added in this change.
    #[must_use]
    pub fn operation_is_new(&self) -> bool {
        matches!(self.operation_change, Some(ChangeKind::Added))
    }
}
