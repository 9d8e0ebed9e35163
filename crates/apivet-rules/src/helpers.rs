//! Shared predicates and payload probes for the rule catalog.
//!
//! Casing validators are named, immutable regexes constructed once at first
//! use and shared by every rule that needs them.

use std::sync::LazyLock;

use apivet_core::context::RuleContext;
use apivet_core::fact::{Fact, Location};
use apivet_core::lifecycle::Stability;
use regex::Regex;
use serde_json::Value;

/// Extension key carrying a resource document's stability level.
pub const STABILITY_KEY: &str = "x-api-stability";

/// The JSON:API media type.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

static SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+(?:_[a-z\d]+)*$").expect("snake case regex is valid"));

static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z\d]+(?:-[a-z\d]+)*$").expect("kebab case regex is valid"));

static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z\d]*$").expect("camel case regex is valid"));

static PASCAL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z\d]*$").expect("pascal case regex is valid"));

static OPERATION_VERB_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(get|create|list|update|delete)[A-Z]").expect("verb prefix regex is valid")
});

static ITEM_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[a-z]*_?id\}$").expect("item path regex is valid"));

/// Whether a name is snake_case.
#[must_use]
pub fn is_snake_case(name: &str) -> bool {
    SNAKE_CASE.is_match(name)
}

/// Whether a name is kebab-case.
#[must_use]
pub fn is_kebab_case(name: &str) -> bool {
    KEBAB_CASE.is_match(name)
}

/// Whether a name is camelCase.
#[must_use]
pub fn is_camel_case(name: &str) -> bool {
    CAMEL_CASE.is_match(name)
}

/// Whether a name is PascalCase.
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    PASCAL_CASE.is_match(name)
}

/// Whether a dotted name is made of non-empty snake_case segments, e.g.
/// `filter.sort_order`.
#[must_use]
pub fn is_dotted_snake_case(name: &str) -> bool {
    !name.starts_with('.')
        && !name.ends_with('.')
        && name.split('.').all(|segment| is_snake_case(segment))
}

/// Whether an operation id starts with one of the standard verbs followed by
/// a capitalized noun, e.g. `listThings`.
#[must_use]
pub fn has_operation_verb_prefix(operation_id: &str) -> bool {
    OPERATION_VERB_PREFIX.is_match(operation_id)
}

/// Whether a path belongs to the OpenAPI introspection surface.
#[must_use]
pub fn is_openapi_path(path: &str) -> bool {
    path.contains("/openapi")
}

/// Whether a path addresses a single item, i.e. ends in an `{..._id}`
/// parameter.
#[must_use]
pub fn is_item_path(path: &str) -> bool {
    ITEM_PATH.is_match(path)
}

/// Whether a path addresses a relationship of a resource.
#[must_use]
pub fn is_relationship_path(path: &str) -> bool {
    path.contains("/relationships/")
}

/// Whether the change under evaluation targets a stability level that allows
/// breaking changes without versioning.
#[must_use]
pub fn breaking_change_allowed(context: &RuleContext<'_>) -> bool {
    context.custom.change_version.stability.allows_breaking_changes()
}

/// Whether the context's operation exists and sits outside the OpenAPI
/// introspection surface.
#[must_use]
pub fn outside_openapi(context: &RuleContext<'_>) -> bool {
    context
        .operation()
        .is_some_and(|op| !is_openapi_path(&op.path))
}

/// Whether the context's operation uses the given lowercase method.
#[must_use]
pub fn method_is(context: &RuleContext<'_>, method: &str) -> bool {
    context.operation().is_some_and(|op| op.method == method)
}

/// The status code of a response or response-header fact.
#[must_use]
pub fn response_status(fact: &Fact) -> Option<&str> {
    match &fact.location {
        Location::Response { status_code, .. }
        | Location::ResponseHeader { status_code, .. } => Some(status_code),
        _ => None,
    }
}

/// The content type of a request-body fact.
#[must_use]
pub fn request_content_type(fact: &Fact) -> Option<&str> {
    match &fact.location {
        Location::Request { content_type, .. } => Some(content_type),
        _ => None,
    }
}

/// The property trail of a property fact.
#[must_use]
pub fn property_trail(fact: &Fact) -> &[String] {
    match &fact.location {
        Location::Property { trail, .. } => trail,
        _ => &[],
    }
}

/// Whether a property fact lives in a request body.
#[must_use]
pub fn is_request_property(fact: &Fact) -> bool {
    matches!(
        &fact.location,
        Location::Property { body, .. } if body.response_status.is_none()
    )
}

/// A string field of a payload object.
#[must_use]
pub fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

/// The stability level a specification payload declares, if it parses.
#[must_use]
pub fn stability_of(payload: &Value) -> Option<Stability> {
    str_field(payload, STABILITY_KEY)?.parse().ok()
}

/// Whether an operation payload declares a query parameter with the given
/// name.
#[must_use]
pub fn has_query_parameter(operation: &Value, name: &str) -> bool {
    operation
        .get("parameters")
        .and_then(Value::as_array)
        .is_some_and(|parameters| {
            parameters.iter().any(|parameter| {
                str_field(parameter, "in") == Some("query")
                    && str_field(parameter, "name") == Some(name)
            })
        })
}

/// Whether a response payload declares the given header, case-insensitively.
#[must_use]
pub fn has_response_header(response: &Value, name: &str) -> bool {
    response
        .get("headers")
        .and_then(Value::as_object)
        .is_some_and(|headers| headers.keys().any(|key| key.eq_ignore_ascii_case(name)))
}

/// Whether a response payload declares any body content.
#[must_use]
pub fn has_content(response: &Value) -> bool {
    response
        .get("content")
        .and_then(Value::as_object)
        .is_some_and(|content| !content.is_empty())
}

/// Whether a response payload offers a body with the given content type.
#[must_use]
pub fn has_content_type(response: &Value, content_type: &str) -> bool {
    response
        .get("content")
        .and_then(Value::as_object)
        .is_some_and(|content| content.contains_key(content_type))
}

/// Whether a schema resolves to concrete types through any
/// `oneOf`/`allOf`/`anyOf` composites it nests.
///
/// Empty composites and schemas with neither a `type` nor a composite are
/// not fully typed.
#[must_use]
pub fn is_fully_typed(schema: &Value) -> bool {
    let mut pending = vec![schema];
    while let Some(current) = pending.pop() {
        if current.get("type").is_some() {
            continue;
        }
        let composite = ["oneOf", "allOf", "anyOf"]
            .iter()
            .find_map(|key| current.get(*key).and_then(Value::as_array));
        match composite {
            Some(variants) if !variants.is_empty() => pending.extend(variants.iter()),
            _ => return false,
        }
    }
    true
}

/// Whether a property trail sits inside a resource's custom `meta` block,
/// where key casing is the resource author's concern.
#[must_use]
pub fn is_resource_meta_trail(trail: &[String]) -> bool {
    let meta_index = match trail {
        [first, second, ..] if first == "data" && second == "meta" => 1,
        [first, second, third, ..] if first == "data" && second == "items" && third == "meta" => 2,
        _ => return false,
    };
    trail.len() > meta_index + 1
}

/// Whether a property trail sits strictly inside `data.attributes` (or
/// `data.items.attributes` for collections).
#[must_use]
pub fn is_within_attributes(trail: &[String]) -> bool {
    match trail {
        [first, second, rest @ ..] if first == "data" && second == "attributes" => {
            !rest.is_empty()
        },
        [first, second, third, rest @ ..]
            if first == "data" && second == "items" && third == "attributes" =>
        {
            !rest.is_empty()
        },
        _ => false,
    }
}
