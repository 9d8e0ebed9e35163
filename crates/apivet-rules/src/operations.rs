//! Operation-level rules: naming, required metadata, parameter hygiene, and
//! breaking-change guards.

use std::sync::LazyLock;

use apivet_core::fact::FactKind;
use apivet_core::matcher::{any_string, Matcher, Pattern};
use apivet_core::rule::{Rule, Ruleset, Violation};
use chrono::NaiveDate;
use serde_json::Value;

use crate::helpers::{
    breaking_change_allowed, has_operation_verb_prefix, has_query_parameter, is_camel_case,
    is_dotted_snake_case, is_snake_case, str_field,
};
use crate::links;

const OPERATION: &[FactKind] = &[FactKind::Operation];
const QUERY_PARAMETER: &[FactKind] = &[FactKind::QueryParameter];
const PATH_PARAMETER: &[FactKind] = &[FactKind::PathParameter];
const PATH_AND_QUERY_PARAMETERS: &[FactKind] =
    &[FactKind::PathParameter, FactKind::QueryParameter];
const ALL_PARAMETERS: &[FactKind] = &[
    FactKind::QueryParameter,
    FactKind::PathParameter,
    FactKind::HeaderParameter,
];
const RESPONSE: &[FactKind] = &[FactKind::Response];

/// Operation id conventions only apply to versions dated after the standard
/// took effect.
static OPERATION_ID_EFFECTIVE_DATE: LazyLock<NaiveDate> =
    LazyLock::new(|| NaiveDate::from_ymd_opt(2021, 7, 1).expect("effective date is valid"));

/// The operation rule family.
#[must_use]
pub fn operation_rules() -> Ruleset {
    Ruleset::new(
        "operation rules",
        vec![
            operation_id().into(),
            operation_id_set().into(),
            operation_tags().into(),
            operation_summary().into(),
            consistent_operation_ids().into(),
            parameter_case().into(),
            no_put_method().into(),
            require_version_parameter().into(),
            tenant_formatting().into(),
            path_element_casing().into(),
            prevent_adding_required_query_parameters().into(),
            prevent_optional_to_required_query_parameters().into(),
            prevent_removing_status_codes().into(),
            prevent_changing_parameter_default().into(),
            prevent_changing_parameter_schema("format").into(),
            prevent_changing_parameter_schema("pattern").into(),
            prevent_changing_parameter_schema("type").into(),
            resource_root_parameter().into(),
        ],
    )
}

fn operation_id() -> Rule {
    let well_formed = Matcher::new(
        "an id that is camelCase and starts with get|create|list|update|delete",
        |value| {
            value
                .as_str()
                .is_some_and(|id| is_camel_case(id) && has_operation_verb_prefix(id))
        },
    );
    let pattern = Pattern::object([("operationId", well_formed.into())]);
    Rule::new("operation id", OPERATION, move |a| {
        a.added_matches(
            "be camelCase and start with get|create|list|update|delete",
            &pattern,
        );
        a.changed_matches(
            "be camelCase and start with get|create|list|update|delete",
            &pattern,
        );
    })
    .docs_link(links::standards::OPERATION_IDS)
    .when(|_fact, context| {
        context
            .operation()
            .is_some_and(|op| !op.path.starts_with("/openapi"))
            && context.custom.change_version.date > *OPERATION_ID_EFFECTIVE_DATE
    })
}

fn operation_id_set() -> Rule {
    let pattern = Pattern::object([("operationId", any_string().into())]);
    Rule::new("operation id set", OPERATION, move |a| {
        a.requirement_matches("operationId must be set and a string", &pattern);
    })
    .docs_link(links::standards::OPERATION_IDS)
}

fn operation_tags() -> Rule {
    let pattern = Pattern::object([("tags", Pattern::each(any_string().into()))]);
    Rule::new("operation tags", OPERATION, move |a| {
        a.requirement_matches("tags must exist and have at least one tag", &pattern);
    })
    .docs_link(links::standards::TAGS)
}

fn operation_summary() -> Rule {
    let pattern = Pattern::object([("summary", any_string().into())]);
    Rule::new("operation summary", OPERATION, move |a| {
        a.requirement_matches("must have a summary", &pattern);
    })
    .docs_link(links::standards::OPERATION_SUMMARY)
    .when(|_fact, context| {
        context
            .operation()
            .is_some_and(|op| !op.path.starts_with("/openapi"))
    })
}

fn consistent_operation_ids() -> Rule {
    Rule::new("consistent operation ids", OPERATION, |a| {
        a.changed("have consistent operation IDs", |before, after| {
            if str_field(before, "operationId") != str_field(after, "operationId") {
                return Err(Violation::new("operationIds was changed"));
            }
            Ok(())
        });
    })
    .docs_link(links::standards::OPERATION_IDS)
    .when(|_fact, context| !breaking_change_allowed(context))
}

fn parameter_case() -> Rule {
    Rule::new(
        "operation parameters snake case",
        PATH_AND_QUERY_PARAMETERS,
        |a| match a.fact().kind() {
            FactKind::PathParameter => {
                a.added("use the correct case", |parameter| {
                    let name = str_field(parameter, "name").unwrap_or_default();
                    if !is_snake_case(name) {
                        return Err(Violation::new(format!(
                            "expected parameter name {name} to be snake case"
                        )));
                    }
                    Ok(())
                });
            },
            FactKind::QueryParameter => {
                a.added("use the correct case", |parameter| {
                    let name = str_field(parameter, "name").unwrap_or_default();
                    if !is_dotted_snake_case(name) {
                        return Err(Violation::new(format!(
                            "expected parameter name {name} to be snake case"
                        )));
                    }
                    Ok(())
                });
            },
            _ => {},
        },
    )
    .docs_link(links::standards::PARAMETER_NAMES_PATH_COMPONENTS)
}

fn no_put_method() -> Rule {
    Rule::new("no put method", OPERATION, |a| {
        let method = a.context().operation().map(|op| op.method.clone());
        a.added("not use put method", move |_operation| {
            if method.as_deref() == Some("put") {
                return Err(Violation::new("put is not allowed in JSON:API"));
            }
            Ok(())
        });
    })
}

fn require_version_parameter() -> Rule {
    Rule::new("require version parameter", OPERATION, |a| {
        a.requirement("include a version query parameter", |operation| {
            if !has_query_parameter(operation, "version") {
                return Err(Violation::new(
                    "expected operation to have a version query parameter",
                ));
            }
            Ok(())
        });
    })
    .docs_link(links::versioning::VERSION_PARAMETER)
    .when(|_fact, context| {
        context
            .operation()
            .is_some_and(|op| !op.path.starts_with("/openapi"))
    })
}

fn tenant_formatting() -> Rule {
    Rule::new("tenant formatting", PATH_PARAMETER, |a| {
        a.requirement("use UUID for org_id or group_id", |parameter| {
            let name = str_field(parameter, "name").unwrap_or_default();
            if name != "org_id" && name != "group_id" {
                return Ok(());
            }
            let Some(schema) = parameter.get("schema") else {
                return Err(Violation::new("expected parameter to have a schema"));
            };
            if schema.get("$ref").is_none() && str_field(schema, "format") != Some("uuid") {
                return Err(Violation::new("expected parameter to use format uuid"));
            }
            Ok(())
        });
    })
    .docs_link(links::standards::TENANT_RESOURCES)
}

fn path_element_casing() -> Rule {
    Rule::new("path element casing", OPERATION, |a| {
        let path = a
            .context()
            .operation()
            .map(|op| op.path.clone())
            .unwrap_or_default();
        a.requirement("use the right casing for path elements", move |_operation| {
            let invalid = path
                .split('?')
                .next()
                .unwrap_or_default()
                .split('/')
                // Skip the empty leading segment and parameters (their own rule).
                .filter(|part| !part.is_empty() && !part.starts_with('{'))
                .any(|part| !is_snake_case(part));
            if invalid {
                return Err(Violation::new(format!(
                    "expected {path} to support the correct casing"
                )));
            }
            Ok(())
        });
    })
    .docs_link(links::standards::PARAMETER_NAMES_PATH_COMPONENTS)
}

fn resource_root_parameter() -> Rule {
    Rule::new("resource path cannot begin with a parameter", OPERATION, |a| {
        let path = a
            .context()
            .operation()
            .map(|op| op.path.clone())
            .unwrap_or_default();
        a.requirement("declare a resource name at the path root", move |_operation| {
            if path.starts_with("/{") {
                return Err(Violation::new(format!(
                    "expected {path} to begin with a resource name, not a parameter"
                )));
            }
            Ok(())
        });
    })
}

fn prevent_adding_required_query_parameters() -> Rule {
    Rule::new(
        "prevent adding required query parameter",
        QUERY_PARAMETER,
        |a| {
            a.added("not be required", |parameter| {
                if parameter.get("required").and_then(Value::as_bool) == Some(true) {
                    let name = str_field(parameter, "name").unwrap_or_default();
                    return Err(Violation::new(format!(
                        "expected request query parameter {name} to not be required"
                    )));
                }
                Ok(())
            });
        },
    )
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|_fact, context| !breaking_change_allowed(context) && !context.operation_is_new())
}

fn prevent_optional_to_required_query_parameters() -> Rule {
    Rule::new(
        "prevent changing optional query parameter to required",
        QUERY_PARAMETER,
        |a| {
            a.changed("not be required", |before, after| {
                let was_required = before.get("required").and_then(Value::as_bool) == Some(true);
                let is_required = after.get("required").and_then(Value::as_bool) == Some(true);
                if !was_required && is_required {
                    let name = str_field(after, "name").unwrap_or_default();
                    return Err(Violation::new(format!(
                        "expected request query parameter {name} to not change \
                         from optional to required"
                    )));
                }
                Ok(())
            });
        },
    )
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|_fact, context| !breaking_change_allowed(context))
}

fn prevent_removing_status_codes() -> Rule {
    Rule::new("prevent removing status codes", RESPONSE, |a| {
        a.removed("not be removed", |_response| {
            Err(Violation::new("must not remove response status code"))
        });
    })
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|_fact, context| !breaking_change_allowed(context))
}

fn prevent_changing_parameter_default() -> Rule {
    Rule::new(
        "prevent changing parameter default value",
        QUERY_PARAMETER,
        |a| {
            a.changed("not change the default value", |before, after| {
                let old = schema_field(before, "default");
                let new = schema_field(after, "default");
                if old != new {
                    return Err(Violation::new(format!(
                        "default value was changed from {} to {}",
                        render(old),
                        render(new)
                    )));
                }
                Ok(())
            });
        },
    )
    .docs_link(links::versioning::BREAKING_CHANGES)
    .when(|_fact, context| !breaking_change_allowed(context))
}

fn prevent_changing_parameter_schema(field: &'static str) -> Rule {
    let name = match field {
        "format" => "prevent changing parameter schema format",
        "pattern" => "prevent changing parameter schema pattern",
        _ => "prevent changing parameter schema type",
    };
    Rule::new(name, ALL_PARAMETERS, move |a| {
        a.changed("not change the parameter schema", move |before, after| {
            let old = schema_field(before, field);
            let new = schema_field(after, field);
            if old != new {
                return Err(Violation::new(format!(
                    "schema {field} was changed from {} to {}",
                    render(old),
                    render(new)
                )));
            }
            Ok(())
        });
    })
    .when(|_fact, context| !breaking_change_allowed(context))
}

fn schema_field<'a>(parameter: &'a Value, field: &str) -> Option<&'a Value> {
    parameter.get("schema")?.get(field)
}

fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "(none)".to_string(), Value::to_string)
}
