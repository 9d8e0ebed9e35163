//! Specification-level rules: component naming, tag metadata, and the
//! versioned-OpenAPI listing surface of compiled documents.

use apivet_core::fact::FactKind;
use apivet_core::rule::{Rule, Ruleset, Violation};
use serde_json::Value;

use crate::helpers::{is_dotted_snake_case, is_pascal_case, is_snake_case, STABILITY_KEY};
use crate::links;

const SPECIFICATION: &[FactKind] = &[FactKind::Specification];

/// The specification rule family.
#[must_use]
pub fn specification_rules() -> Ruleset {
    Ruleset::new(
        "specification rules",
        vec![
            component_name_case().into(),
            specification_tags().into(),
            get_openapi_versions().into(),
            list_openapi_versions().into(),
        ],
    )
}

/// A component name decoded from its possibly namespace- and
/// property-qualified form.
struct ComponentName<'a> {
    local_name: &'a str,
    local_prop: Option<&'a str>,
    namespace: Option<&'a str>,
}

/// Decodes `namespace.ModelName` and `namespace.ModelName.property_name`
/// forms; a trailing snake_case segment is a model property (shared
/// parameter or header components), anything else is a model name.
fn decode_component_name(name: &str) -> ComponentName<'_> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        [] | [_] => ComponentName {
            local_name: name,
            local_prop: None,
            namespace: None,
        },
        [namespace @ .., model, last] if is_snake_case(last) => ComponentName {
            local_name: model,
            local_prop: Some(last),
            namespace: (!namespace.is_empty()).then(|| {
                let end = name.len() - model.len() - last.len() - 2;
                &name[..end]
            }),
        },
        [.., model] => {
            let end = name.len() - model.len() - 1;
            ComponentName {
                local_name: model,
                local_prop: None,
                namespace: Some(&name[..end]),
            }
        },
    }
}

fn component_name_case() -> Rule {
    Rule::new("component names", SPECIFICATION, |a| {
        a.requirement("use pascal case for component names", |specification| {
            let components = specification
                .get("components")
                .and_then(Value::as_object);
            let Some(components) = components else {
                return Ok(());
            };
            for (component_type, named) in components {
                if component_type.starts_with("x-") || component_type == "securitySchemes" {
                    continue;
                }
                let Some(named) = named.as_object() else {
                    continue;
                };
                for component_name in named.keys() {
                    let decoded = decode_component_name(component_name);
                    if !is_pascal_case(decoded.local_name) {
                        return Err(Violation::new(format!(
                            "expected {} to be pascal case in component {component_name}",
                            decoded.local_name
                        )));
                    }
                    if let Some(prop) = decoded.local_prop {
                        if !is_snake_case(prop) {
                            return Err(Violation::new(format!(
                                "expected {prop} to be snake case in component {component_name}"
                            )));
                        }
                    }
                    if let Some(namespace) = decoded.namespace {
                        if !is_dotted_snake_case(namespace) {
                            return Err(Violation::new(format!(
                                "expected {namespace} to be dot case in component \
                                 {component_name}"
                            )));
                        }
                    }
                }
            }
            Ok(())
        });
    })
    .docs_link(links::standards::COMPONENT_NAMING)
}

fn specification_tags() -> Rule {
    Rule::new("specification tags", SPECIFICATION, |a| {
        a.requirement("have name and description for tags", |specification| {
            let tags = specification
                .get("tags")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for tag in tags {
                if tag.get("name").is_none() {
                    return Err(Violation::new("name is not in tag"));
                }
                if tag.get("description").is_none() {
                    return Err(Violation::new("description is not in tag"));
                }
            }
            Ok(())
        });
    })
    .docs_link(links::standards::TAGS)
}

/// Compiled documents aggregate resource versions and carry no stability
/// key of their own; only they must expose the version listing routes.
fn is_compiled_document(fact: &apivet_core::fact::Fact) -> bool {
    fact.current()
        .is_some_and(|payload| payload.get(STABILITY_KEY).is_none())
}

fn has_path(specification: &Value, route: &str) -> bool {
    specification
        .get("paths")
        .and_then(Value::as_object)
        .is_some_and(|paths| paths.contains_key(route))
}

fn list_openapi_versions() -> Rule {
    Rule::new("list open api versions", SPECIFICATION, |a| {
        a.requirement(
            "list the available versioned OpenAPI specifications",
            |specification| {
                if !has_path(specification, "/openapi") {
                    return Err(Violation::new("expected route /openapi to be included"));
                }
                Ok(())
            },
        );
    })
    .docs_link(links::standards::OPENAPI_VERSIONS)
    .when(|fact, _context| is_compiled_document(fact))
}

fn get_openapi_versions() -> Rule {
    Rule::new("get open api versions", SPECIFICATION, |a| {
        a.requirement(
            "provide versioned OpenAPI specifications",
            |specification| {
                if !has_path(specification, "/openapi/{version}") {
                    return Err(Violation::new(
                        "expected route /openapi/{version} to be included",
                    ));
                }
                Ok(())
            },
        );
    })
    .docs_link(links::standards::OPENAPI_VERSIONS)
    .when(|fact, _context| is_compiled_document(fact))
}
