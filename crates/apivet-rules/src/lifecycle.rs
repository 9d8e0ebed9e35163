//! Lifecycle rules: stability declaration, stability transitions, and sunset
//! gating of removals.
//!
//! The policy arithmetic lives in [`apivet_core::lifecycle`]; these rules
//! only route the right facts into it and convert its errors into
//! violations.

use apivet_core::fact::{ChangeKind, FactKind};
use apivet_core::lifecycle::{is_allowed_transition, sunset::check_sunset, Stability};
use apivet_core::rule::{Rule, Ruleset, Violation};
use serde_json::Value;

use crate::helpers::{stability_of, str_field, STABILITY_KEY};
use crate::links;

const SPECIFICATION: &[FactKind] = &[FactKind::Specification];
const REMOVABLE: &[FactKind] = &[FactKind::Specification, FactKind::Operation];

/// The lifecycle rule family.
#[must_use]
pub fn lifecycle_rules() -> Ruleset {
    Ruleset::new(
        "api lifecycle ruleset",
        vec![
            stability_requirement().into(),
            stability_transitions().into(),
            sunset_rules().into(),
        ],
    )
}

fn stability_requirement() -> Rule {
    Rule::new("resource stability", SPECIFICATION, |a| {
        a.requirement("be provided for every resource document", |specification| {
            let declared = str_field(specification, STABILITY_KEY);
            if declared.is_some_and(|label| label.parse::<Stability>().is_ok()) {
                return Ok(());
            }
            Err(Violation::new(format!(
                "{} must be one of allowed values wip, experimental, beta, ga",
                declared.unwrap_or("(none)")
            )))
        });
    })
    .docs_link(links::versioning::STABILITY_LEVELS)
    .when(|fact, _context| fact.change != ChangeKind::Removed)
}

fn stability_transitions() -> Rule {
    Rule::new("resource stability transitions", SPECIFICATION, |a| {
        a.changed("not change unless it was wip", |before, after| {
            let before_stability = stability_of(before);
            let after_stability = stability_of(after);
            // A missing side means a new or deleted document; creation is
            // free and deletion is governed by the sunset rules.
            let (Some(from), Some(to)) = (before_stability, after_stability) else {
                return Ok(());
            };
            if !is_allowed_transition(Some(from), Some(to)) {
                return Err(Violation::new(format!(
                    "stability transition from '{from}' to '{to}' not allowed"
                )));
            }
            Ok(())
        });
    })
    .docs_link(links::versioning::PROMOTING_STABILITY)
}

fn sunset_rules() -> Rule {
    Rule::new("sunset rules", REMOVABLE, |a| {
        let custom = a.context().custom;
        a.requirement("follow sunset rules", move |_current: &Value| {
            check_sunset(
                &custom.resource_versions,
                &custom.change_resource,
                custom.change_version.date,
                custom.change_version.stability,
                custom.change_date,
            )
            .map_err(|error| Violation::new(error.to_string()))
        });
    })
    .when(|fact, context| {
        fact.change == ChangeKind::Removed
            && context.custom.change_version.stability != Stability::Wip
    })
}
