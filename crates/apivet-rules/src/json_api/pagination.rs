//! Pagination conventions for collection GET operations.

use apivet_core::fact::FactKind;
use apivet_core::matcher::Pattern;
use apivet_core::rule::{Rule, Ruleset, Violation};
use serde_json::Value;

use crate::helpers::{
    has_query_parameter, is_item_path, method_is, outside_openapi, response_status,
    JSON_API_CONTENT_TYPE,
};
use crate::links;

const OPERATION: &[FactKind] = &[FactKind::Operation];
const RESPONSE: &[FactKind] = &[FactKind::Response];

/// Query parameters every collection GET must support.
pub const PAGINATION_QUERY_PARAMETERS: &[&str] = &["starting_after", "ending_before", "limit"];

/// The pagination rule family; applies outside the introspection surface to
/// collection paths only.
#[must_use]
pub fn pagination_rules() -> Ruleset {
    Ruleset::new(
        "pagination",
        vec![
            pagination_parameters().into(),
            unsupported_pagination_parameters().into(),
            pagination_links().into(),
        ],
    )
    .docs_link(links::json_api::PAGINATION)
    .when(|context| {
        outside_openapi(context)
            && context.operation().is_some_and(|op| !is_item_path(&op.path))
    })
}

fn missing_parameter(operation: &Value) -> Option<&'static str> {
    PAGINATION_QUERY_PARAMETERS
        .iter()
        .find(|name| !has_query_parameter(operation, name))
        .copied()
}

fn present_parameter(operation: &Value) -> Option<&'static str> {
    PAGINATION_QUERY_PARAMETERS
        .iter()
        .find(|name| has_query_parameter(operation, name))
        .copied()
}

fn pagination_parameters() -> Rule {
    Rule::new("pagination parameters", OPERATION, |a| {
        a.added("support pagination parameters", |operation| {
            if let Some(name) = missing_parameter(operation) {
                return Err(Violation::new(format!(
                    "expected operation to support pagination parameter {name}"
                )));
            }
            Ok(())
        });
        a.changed("support pagination parameters", |_before, after| {
            if let Some(name) = missing_parameter(after) {
                return Err(Violation::new(format!(
                    "expected operation to support pagination parameter {name}"
                )));
            }
            Ok(())
        });
    })
    .when(|_fact, context| method_is(context, "get"))
}

fn unsupported_pagination_parameters() -> Rule {
    Rule::new("unsupported pagination parameters", OPERATION, |a| {
        a.added(
            "not use pagination parameters for non-GET operations",
            |operation| {
                if let Some(name) = present_parameter(operation) {
                    return Err(Violation::new(format!(
                        "expected operation to not support pagination parameter {name}"
                    )));
                }
                Ok(())
            },
        );
        a.changed(
            "not use pagination parameters for non-GET operations",
            |_before, after| {
                if let Some(name) = present_parameter(after) {
                    return Err(Violation::new(format!(
                        "expected operation to not support pagination parameter {name}"
                    )));
                }
                Ok(())
            },
        );
    })
    .when(|_fact, context| !method_is(context, "get"))
}

fn pagination_links() -> Rule {
    let pattern = Pattern::object([(
        "content",
        Pattern::object([(
            JSON_API_CONTENT_TYPE,
            Pattern::object([(
                "schema",
                Pattern::object([(
                    "properties",
                    Pattern::object([("links", Pattern::empty_object())]),
                )]),
            )]),
        )]),
    )]);
    Rule::new("pagination links", RESPONSE, move |a| {
        a.added_matches("include pagination links", &pattern);
        a.changed_matches("include pagination links", &pattern);
    })
    .when(|fact, context| method_is(context, "get") && response_status(fact) == Some("200"))
}
