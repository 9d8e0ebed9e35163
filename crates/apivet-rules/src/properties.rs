//! Body property rules: key casing, removal guards, required-flag guards,
//! and format conventions.

use apivet_core::fact::{ChangeKind, FactKind};
use apivet_core::rule::{Rule, Ruleset, Violation};
use serde_json::Value;

use crate::helpers::{
    breaking_change_allowed, is_fully_typed, is_request_property, is_resource_meta_trail,
    is_snake_case, is_within_attributes, property_trail, str_field,
};
use crate::links;

const PROPERTY: &[FactKind] = &[FactKind::Property];

/// The property rule family.
#[must_use]
pub fn property_rules() -> Ruleset {
    Ruleset::new(
        "property rules",
        vec![
            property_casing().into(),
            prevent_property_removal().into(),
            required_request_properties().into(),
            date_formatting().into(),
            array_items_typed().into(),
            enum_or_example().into(),
        ],
    )
}

fn property_key(a: &apivet_core::rule::Assertions<'_>) -> Option<String> {
    property_trail(a.fact()).last().cloned()
}

fn property_casing() -> Rule {
    Rule::new("property casing", PROPERTY, |a| {
        let key = property_key(a);
        // Keys inside a resource's custom meta block are the resource
        // author's concern.
        let in_meta_block = is_resource_meta_trail(property_trail(a.fact()));
        a.added("have snake case keys", move |_property| {
            if in_meta_block {
                return Ok(());
            }
            let Some(key) = key else {
                return Ok(());
            };
            if !is_snake_case(&key) {
                return Err(Violation::new(format!("expected {key} to be snake case")));
            }
            Ok(())
        });
    })
}

fn prevent_property_removal() -> Rule {
    Rule::new("prevent property removal", PROPERTY, |a| {
        let key = property_key(a).unwrap_or_default();
        a.removed("not be removed", move |_before| {
            Err(Violation::new(format!(
                "expected property {key} to not be removed"
            )))
        });
    })
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|_fact, context| {
        !matches!(
            context.operation_change,
            Some(ChangeKind::Added | ChangeKind::Removed)
        ) && !breaking_change_allowed(context)
    })
}

fn required_request_properties() -> Rule {
    Rule::new("prevent adding a required request property", PROPERTY, |a| {
        a.added("not add required request property", |property| {
            if property.get("required").and_then(Value::as_bool) == Some(true) {
                return Err(Violation::new(
                    "cannot add a required request property to an existing operation",
                ));
            }
            Ok(())
        });
        a.changed(
            "not make an optional request property required",
            |before, after| {
                let was_required = before.get("required").and_then(Value::as_bool) == Some(true);
                let is_required = after.get("required").and_then(Value::as_bool) == Some(true);
                if !was_required && is_required {
                    return Err(Violation::new("cannot make a request property required"));
                }
                Ok(())
            },
        );
    })
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|fact, context| {
        is_request_property(fact)
            && !context.operation_is_new()
            && !breaking_change_allowed(context)
    })
}

fn date_formatting() -> Rule {
    Rule::new("property date formatting", PROPERTY, |a| {
        let key = property_key(a).unwrap_or_default();
        a.added("use date-time for dates", move |property| {
            if key.ends_with("_at") && str_field(property, "format") != Some("date-time") {
                return Err(Violation::new(
                    "expected property name ending in '_at' to have format date-time",
                ));
            }
            Ok(())
        });
    })
    .docs_link(links::standards::TIMESTAMP_PROPERTIES)
}

fn array_items_typed() -> Rule {
    Rule::new("array with items", PROPERTY, |a| {
        a.requirement("have type for array items", |property| {
            if str_field(property, "type") == Some("array") {
                let fully_typed = property
                    .get("items")
                    .is_some_and(is_fully_typed);
                if !fully_typed {
                    return Err(Violation::new("type was not found for array items"));
                }
            }
            Ok(())
        });
    })
}

fn enum_or_example() -> Rule {
    Rule::new("property enum or example", PROPERTY, |a| {
        let within_attributes = is_within_attributes(property_trail(a.fact()));
        a.added("have enum or example", move |property| {
            if !within_attributes {
                return Ok(());
            }
            if matches!(str_field(property, "type"), Some("object" | "boolean")) {
                return Ok(());
            }
            if property.get("enum").is_none() && property.get("example").is_none() {
                return Err(Violation::new("expect property to have an enum or example"));
            }
            Ok(())
        });
    })
    .docs_link(links::standards::FORMATS)
    .when(|fact, _context| is_request_property(fact))
}
