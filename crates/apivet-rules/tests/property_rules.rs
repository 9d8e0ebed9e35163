//! Property ruleset behavior.

mod common;

use apivet_core::lifecycle::Stability;
use apivet_core::Fact;
use apivet_rules::properties::property_rules;
use common::*;
use serde_json::json;

fn rules() -> Vec<apivet_core::rule::RuleNode> {
    vec![property_rules().into()]
}

#[test]
fn added_property_keys_must_be_snake_case() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "testedAt"]),
            json!({"type": "string", "example": "x"}),
        ),
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "tested_at"]),
            json!({"type": "string", "format": "date-time"}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let casing = results_for(&results, "property casing");
    assert_eq!(casing.len(), 2);
    assert!(!casing[0].passed);
    assert!(casing[0]
        .error
        .as_deref()
        .expect("has error")
        .contains("expected testedAt to be snake case"));
    assert!(casing[1].passed);
}

#[test]
fn custom_meta_block_keys_are_not_checked() {
    let custom = context(Stability::Ga);
    let facts = vec![Fact::added(
        response_property("get", "/things", "200", &["data", "meta", "customField"]),
        json!({"type": "string"}),
    )];
    let results = run(rules(), &facts, &custom);
    assert!(results_for(&results, "property casing")[0].passed);
}

#[test]
fn property_removal_is_blocked_on_stable_versions() {
    let custom = context(Stability::Ga);
    let facts = vec![Fact::removed(
        response_property("get", "/things", "200", &["data", "attributes", "name"]),
        json!({"type": "string"}),
    )];
    let results = run(rules(), &facts, &custom);
    let removal = results_for(&results, "prevent property removal");
    assert_eq!(removal.len(), 1);
    assert!(!removal[0].passed);
    assert!(removal[0]
        .error
        .as_deref()
        .expect("has error")
        .contains("expected property name to not be removed"));
}

#[test]
fn property_removal_is_allowed_when_the_operation_goes_away() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::removed(operation("get", "/things"), json!({"operationId": "listThings"})),
        Fact::removed(
            response_property("get", "/things", "200", &["data", "attributes", "name"]),
            json!({"type": "string"}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    assert!(results_for(&results, "prevent property removal").is_empty());
}

#[test]
fn required_request_properties_may_not_be_added_to_existing_operations() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::changed(operation("post", "/things"), json!({}), json!({})),
        Fact::added(
            request_property("post", "/things", &["data", "attributes", "name"]),
            json!({"type": "string", "required": true, "example": "x"}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let required = results_for(&results, "prevent adding a required request property");
    assert_eq!(required.len(), 1);
    assert!(!required[0].passed);

    // The same addition in a response body is not a request property.
    let facts = vec![Fact::added(
        response_property("post", "/things", "201", &["data", "attributes", "name"]),
        json!({"type": "string", "required": true}),
    )];
    let results = run(rules(), &facts, &custom);
    assert!(results_for(&results, "prevent adding a required request property").is_empty());
}

#[test]
fn optional_request_properties_may_not_become_required() {
    let custom = context(Stability::Beta);
    let facts = vec![
        Fact::changed(operation("post", "/things"), json!({}), json!({})),
        Fact::changed(
            request_property("post", "/things", &["data", "attributes", "name"]),
            json!({"type": "string"}),
            json!({"type": "string", "required": true}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let required = results_for(&results, "prevent adding a required request property");
    assert_eq!(required.len(), 1);
    assert_eq!(
        required[0].condition,
        "not make an optional request property required"
    );
    assert!(!required[0].passed);
}

#[test]
fn timestamp_properties_use_date_time_format() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "tested_at"]),
            json!({"type": "string"}),
        ),
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "created_at"]),
            json!({"type": "string", "format": "date-time"}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let dates = results_for(&results, "property date formatting");
    assert!(!dates[0].passed);
    assert_eq!(
        dates[0].error.as_deref(),
        Some("expected property name ending in '_at' to have format date-time")
    );
    assert!(dates[1].passed);
}

#[test]
fn array_properties_must_type_their_items() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "labels"]),
            json!({"type": "array"}),
        ),
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "names"]),
            json!({"type": "array", "items": {"type": "string"}}),
        ),
        Fact::added(
            response_property("get", "/things", "200", &["data", "attributes", "mixed"]),
            json!({"type": "array", "items": {"oneOf": [{"type": "string"}, {}]}}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let arrays = results_for(&results, "array with items");
    assert_eq!(arrays.len(), 3);
    assert!(!arrays[0].passed);
    assert!(arrays[1].passed);
    assert!(!arrays[2].passed);
}

#[test]
fn request_attributes_need_an_enum_or_example() {
    let custom = context(Stability::Ga);
    let facts = vec![
        Fact::added(
            request_property("post", "/things", &["data", "attributes", "kind"]),
            json!({"type": "string"}),
        ),
        Fact::added(
            request_property("post", "/things", &["data", "attributes", "status"]),
            json!({"type": "string", "enum": ["on", "off"]}),
        ),
        // Booleans and objects are exempt.
        Fact::added(
            request_property("post", "/things", &["data", "attributes", "enabled"]),
            json!({"type": "boolean"}),
        ),
        // Properties outside attributes are exempt.
        Fact::added(
            request_property("post", "/things", &["data", "type"]),
            json!({"type": "string"}),
        ),
    ];
    let results = run(rules(), &facts, &custom);
    let enums = results_for(&results, "property enum or example");
    assert_eq!(enums.len(), 4);
    assert!(!enums[0].passed);
    assert!(enums[1].passed);
    assert!(enums[2].passed);
    assert!(enums[3].passed);
}
