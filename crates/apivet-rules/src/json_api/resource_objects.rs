//! Resource object shapes: request/response body schemas, content presence,
//! and creation/async headers.

use apivet_core::fact::FactKind;
use apivet_core::matcher::{any_string, Matcher, Pattern};
use apivet_core::rule::{Rule, Ruleset, Violation};
use serde_json::Value;

use crate::helpers::{
    has_content, has_response_header, is_relationship_path, method_is, outside_openapi,
    request_content_type, response_status, JSON_API_CONTENT_TYPE,
};
use crate::links;

const REQUEST: &[FactKind] = &[FactKind::Request];
const RESPONSE: &[FactKind] = &[FactKind::Response];

/// Status codes whose responses carry no body.
const BODYLESS_CODES: &[&str] = &["202", "204", "303"];

/// The resource object rule family.
#[must_use]
pub fn resource_object_rules() -> Ruleset {
    Ruleset::new(
        "resource objects",
        vec![
            request_data_for_patch().into(),
            request_data_for_post().into(),
            request_data_for_relationships().into(),
            response_data_for_patch().into(),
            empty_204_content().into(),
            content_for_other_codes().into(),
            data_property().into(),
            jsonapi_property().into(),
            location_header().into(),
            content_location_header_for_202().into(),
            location_header_for_303().into(),
            self_links().into(),
            get_post_response_data_schema().into(),
            patch_response_data_schema().into(),
            delete_response_data_schema().into(),
        ],
    )
    .docs_link(links::json_api::RESOURCE_OBJECTS)
    .when(outside_openapi)
}

fn resource_id_format() -> Matcher {
    Matcher::new("uuid, uri or ulid format", |value| {
        matches!(value.as_str(), Some("uuid" | "uri" | "ulid"))
    })
}

/// `{id, type, attributes}` member schemas of a full resource object.
fn resource_object_members() -> Pattern {
    Pattern::object([
        (
            "id",
            Pattern::object([
                ("type", Pattern::from("string")),
                ("format", resource_id_format().into()),
            ]),
        ),
        ("type", Pattern::object([("type", any_string().into())])),
        ("attributes", Pattern::object([("type", Pattern::from("object"))])),
    ])
}

/// `{id, type}` member schemas of a relationship resource identifier.
fn resource_identifier_members() -> Pattern {
    Pattern::object([
        (
            "id",
            Pattern::object([
                ("type", Pattern::from("string")),
                ("format", resource_id_format().into()),
            ]),
        ),
        ("type", Pattern::object([("type", any_string().into())])),
    ])
}

fn single_data(members: Pattern) -> Pattern {
    Pattern::object([(
        "data",
        Pattern::object([
            ("type", Pattern::from("object")),
            ("properties", members),
        ]),
    )])
}

fn bulk_data(members: Pattern) -> Pattern {
    Pattern::object([(
        "data",
        Pattern::object([
            ("type", Pattern::from("array")),
            (
                "items",
                Pattern::object([
                    ("type", Pattern::from("object")),
                    ("properties", members),
                ]),
            ),
        ]),
    )])
}

/// Wraps body properties into the request media-type payload shape.
fn request_schema(properties: Pattern) -> Pattern {
    Pattern::object([(
        "schema",
        Pattern::object([
            ("type", Pattern::from("object")),
            ("properties", properties),
        ]),
    )])
}

/// Wraps a schema pattern into the response payload shape under the JSON:API
/// content type.
fn response_schema(schema: Pattern) -> Pattern {
    Pattern::object([(
        "content",
        Pattern::object([(
            JSON_API_CONTENT_TYPE,
            Pattern::object([("schema", schema)]),
        )]),
    )])
}

fn is_json_api_request(fact: &apivet_core::fact::Fact) -> bool {
    request_content_type(fact) == Some(JSON_API_CONTENT_TYPE)
}

fn request_data_for_patch() -> Rule {
    let shapes = vec![
        request_schema(single_data(resource_object_members())),
        request_schema(bulk_data(resource_object_members())),
    ];
    Rule::new("request body for patch", REQUEST, move |a| {
        a.added_matches_one_of("match the JSON:API patch request shape", &shapes);
        a.changed_matches_one_of("match the JSON:API patch request shape", &shapes);
    })
    .docs_link(links::json_api::PATCH_REQUESTS)
    .when(|fact, context| {
        is_json_api_request(fact)
            && method_is(context, "patch")
            && context
                .operation()
                .is_some_and(|op| !is_relationship_path(&op.path))
    })
}

fn request_data_for_post() -> Rule {
    let type_only = Pattern::object([(
        "type",
        Pattern::object([("type", any_string().into())]),
    )]);
    let shapes = vec![
        request_schema(single_data(type_only.clone())),
        request_schema(bulk_data(type_only)),
    ];
    Rule::new("request body for post", REQUEST, move |a| {
        a.added_matches_one_of("match the JSON:API post request shape", &shapes);
        a.changed_matches_one_of("match the JSON:API post request shape", &shapes);
    })
    .docs_link(links::json_api::POST_REQUESTS)
    .when(|fact, context| {
        is_json_api_request(fact)
            && method_is(context, "post")
            && context
                .operation()
                .is_some_and(|op| !is_relationship_path(&op.path))
    })
}

fn request_data_for_relationships() -> Rule {
    let shapes = vec![
        request_schema(bulk_data(resource_identifier_members())),
        request_schema(single_data(resource_identifier_members())),
    ];
    Rule::new(
        "request body for relationship post/patch/delete",
        REQUEST,
        move |a| {
            a.added_matches_one_of("match the JSON:API relationship shape", &shapes);
            a.changed_matches_one_of("match the JSON:API relationship shape", &shapes);
        },
    )
    .docs_link(links::json_api::POST_REQUESTS)
    .when(|fact, context| {
        is_json_api_request(fact)
            && context
                .operation()
                .is_some_and(|op| is_relationship_path(&op.path))
            && ["post", "patch", "delete"]
                .iter()
                .any(|method| method_is(context, method))
    })
}

fn response_data_for_patch() -> Rule {
    let pattern = response_schema(Pattern::object([
        ("type", Pattern::from("object")),
        ("properties", Pattern::empty_object()),
    ]));
    Rule::new("response data for patch", RESPONSE, move |a| {
        a.added_matches("be an object response", &pattern);
        a.changed_matches("be an object response", &pattern);
    })
    .docs_link(links::json_api::PATCH_RESPONSES)
    .when(|fact, context| method_is(context, "patch") && response_status(fact) == Some("200"))
}

fn no_content_check(response: &Value) -> Result<(), Violation> {
    if has_content(response) {
        return Err(Violation::new("expected response to not have content"));
    }
    Ok(())
}

fn empty_204_content() -> Rule {
    Rule::new("empty content for 204 status codes", RESPONSE, |a| {
        a.added("not include content for 204 status codes", no_content_check);
        a.changed("not include content for 204 status codes", |_before, after| {
            no_content_check(after)
        });
    })
    .when(|fact, context| {
        response_status(fact) == Some("204")
            && (method_is(context, "delete") || method_is(context, "patch"))
    })
}

fn content_check(response: &Value) -> Result<(), Violation> {
    if !has_content(response) {
        return Err(Violation::new("expected response to have content"));
    }
    Ok(())
}

fn content_for_other_codes() -> Rule {
    Rule::new("body is required for status!=[202,204,303]", RESPONSE, |a| {
        a.added(
            "include content for status codes other than 202, 204, 303",
            content_check,
        );
        a.changed(
            "include content for status codes other than 202, 204, 303",
            |_before, after| content_check(after),
        );
    })
    .when(|fact, _context| {
        response_status(fact).is_some_and(|status| !BODYLESS_CODES.contains(&status))
    })
}

fn data_property() -> Rule {
    let pattern = response_schema(Pattern::object([(
        "properties",
        Pattern::object([(
            "data",
            Pattern::object([("type", any_string().into())]),
        )]),
    )]));
    Rule::new(
        "include JSON:API data property for 2xx status codes",
        RESPONSE,
        move |a| {
            a.added_matches("have a data property", &pattern);
            a.changed_matches("have a data property", &pattern);
        },
    )
    .when(|fact, context| {
        matches!(response_status(fact), Some("200" | "201"))
            && (method_is(context, "get") || method_is(context, "post"))
    })
}

fn jsonapi_property() -> Rule {
    let pattern = response_schema(Pattern::object([(
        "properties",
        Pattern::object([(
            "jsonapi",
            Pattern::object([("type", any_string().into())]),
        )]),
    )]));
    Rule::new(
        "include JSON:API type property for 2xx status codes",
        RESPONSE,
        move |a| {
            a.added_matches("have a jsonapi property", &pattern);
            a.changed_matches("have a jsonapi property", &pattern);
        },
    )
    .when(|fact, context| {
        matches!(response_status(fact), Some("200" | "201"))
            && (method_is(context, "patch") || method_is(context, "delete"))
    })
}

fn header_check(response: &Value, name: &'static str) -> Result<(), Violation> {
    if !has_response_header(response, name) {
        return Err(Violation::new(format!(
            "expected response to have a {name} header"
        )));
    }
    Ok(())
}

fn location_header() -> Rule {
    Rule::new("location header", RESPONSE, |a| {
        a.added("have a location header", |response| {
            header_check(response, "location")
        });
        a.changed("have a location header", |_before, after| {
            header_check(after, "location")
        });
    })
    .when(|fact, context| {
        // 202 carries Content-Location and 204 carries nothing; both are
        // covered by their own rules.
        method_is(context, "post") && response_status(fact) == Some("201")
    })
}

fn content_location_header_for_202() -> Rule {
    Rule::new("content-location header for 202", RESPONSE, |a| {
        a.added("have a content-location header", |response| {
            header_check(response, "content-location")
        });
        a.changed("have a content-location header", |_before, after| {
            header_check(after, "content-location")
        });
    })
    .when(|fact, context| {
        response_status(fact) == Some("202")
            && ["post", "patch", "delete"]
                .iter()
                .any(|method| method_is(context, method))
    })
}

fn location_header_for_303() -> Rule {
    Rule::new("location header for 303", RESPONSE, |a| {
        a.added("have a location header", |response| {
            header_check(response, "location")
        });
        a.changed("have a location header", |_before, after| {
            header_check(after, "location")
        });
    })
    .when(|fact, _context| response_status(fact) == Some("303"))
}

fn self_links() -> Rule {
    let pattern = response_schema(Pattern::object([(
        "properties",
        Pattern::object([(
            "links",
            Pattern::object([(
                "properties",
                Pattern::object([("self", Pattern::empty_object())]),
            )]),
        )]),
    )]));
    Rule::new("self links", RESPONSE, move |a| {
        a.added_matches("include self links", &pattern);
    })
    .when(|fact, context| {
        let status = response_status(fact);
        ((method_is(context, "get") || method_is(context, "patch")) && status == Some("200"))
            || (method_is(context, "post") && status == Some("201"))
    })
}

fn get_post_response_data_schema() -> Rule {
    let collection = response_schema(Pattern::object([(
        "properties",
        Pattern::object([(
            "data",
            Pattern::object([
                ("type", Pattern::from("array")),
                (
                    "items",
                    Pattern::object([("properties", resource_identifier_members())]),
                ),
            ]),
        )]),
    )]));
    let single = response_schema(Pattern::object([(
        "properties",
        Pattern::object([(
            "data",
            Pattern::object([("properties", resource_identifier_members())]),
        )]),
    )]));
    let shapes = vec![collection, single];
    Rule::new("valid get / post response data schema", RESPONSE, move |a| {
        a.added_matches_one_of("have a valid data schema", &shapes);
        a.changed_matches_one_of("have a valid data schema", &shapes);
    })
    .when(|fact, context| {
        matches!(response_status(fact), Some("200" | "201"))
            && (method_is(context, "get") || method_is(context, "post"))
    })
}

fn patch_response_data_schema() -> Rule {
    let meta_only = response_schema(Pattern::object([(
        "properties",
        Pattern::object([
            ("meta", Pattern::empty_object()),
            ("links", Pattern::empty_object()),
        ]),
    )]));
    let full = response_schema(Pattern::object([(
        "properties",
        Pattern::object([
            (
                "data",
                Pattern::object([("properties", resource_identifier_members())]),
            ),
            ("jsonapi", Pattern::empty_object()),
            ("links", Pattern::empty_object()),
        ]),
    )]));
    let shapes = vec![meta_only, full];
    Rule::new("valid patch response data schema", RESPONSE, move |a| {
        a.added_matches_one_of("have a valid data schema", &shapes);
        a.changed_matches_one_of("have a valid data schema", &shapes);
    })
    .when(|fact, context| method_is(context, "patch") && response_status(fact) == Some("200"))
}

fn delete_response_data_schema() -> Rule {
    let pattern = response_schema(Pattern::object([(
        "properties",
        Pattern::object([("meta", Pattern::empty_object())]),
    )]));
    Rule::new("valid delete response data schema", RESPONSE, move |a| {
        a.added_matches("have a valid data schema", &pattern);
        a.changed_matches("have a valid data schema", &pattern);
    })
    .when(|fact, context| method_is(context, "delete") && response_status(fact) == Some("200"))
}
