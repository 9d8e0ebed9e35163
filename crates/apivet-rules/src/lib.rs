//! Standard compatibility ruleset catalog for the apivet engine.
//!
//! Rule families are declared as static configuration trees — plain
//! constructors returning [`Ruleset`](apivet_core::Ruleset) values — and
//! composed into the active ruleset with [`standard_rules`]. The only
//! configuration surface is *which* named families participate
//! ([`RulesetSelection`]); there is no per-field tuning.
//!
//! # Example
//!
//! ```
//! use apivet_core::runner::RuleRunner;
//! use apivet_rules::{standard_rules, RulesetSelection};
//!
//! let runner = RuleRunner::new(standard_rules(&RulesetSelection::all()));
//! # let _ = runner;
//! ```

pub mod headers;
pub mod helpers;
pub mod json_api;
pub mod lifecycle;
pub mod links;
pub mod operations;
pub mod properties;
pub mod specification;

use apivet_core::rule::RuleNode;

/// Which named rule families participate in the active ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesetSelection {
    /// Operation naming, metadata, and breaking-change guards.
    pub operations: bool,
    /// Stability declaration, transitions, and sunset gating.
    pub lifecycle: bool,
    /// Body property casing, removal, and format rules.
    pub properties: bool,
    /// Response header rules.
    pub headers: bool,
    /// Specification-level rules.
    pub specification: bool,
    /// JSON:API status code, content type, resource object, and pagination
    /// rules.
    pub json_api: bool,
}

impl RulesetSelection {
    /// Every rule family enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            operations: true,
            lifecycle: true,
            properties: true,
            headers: true,
            specification: true,
            json_api: true,
        }
    }
}

impl Default for RulesetSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Composes the active rule tree from the selected families.
#[must_use]
pub fn standard_rules(selection: &RulesetSelection) -> Vec<RuleNode> {
    let mut rules = Vec::new();
    if selection.headers {
        rules.push(headers::response_header_rules().into());
    }
    if selection.lifecycle {
        rules.push(lifecycle::lifecycle_rules().into());
    }
    if selection.operations {
        rules.push(operations::operation_rules().into());
    }
    if selection.properties {
        rules.push(properties::property_rules().into());
    }
    if selection.specification {
        rules.push(specification::specification_rules().into());
    }
    if selection.json_api {
        rules.push(json_api::status_code_rules().into());
        rules.push(json_api::content_type_rule().into());
        rules.push(json_api::resource_object_rules().into());
        rules.push(json_api::pagination_rules().into());
    }
    rules
}
