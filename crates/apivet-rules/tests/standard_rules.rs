//! End-to-end runs of the composed standard ruleset.

mod common;

use apivet_core::lifecycle::Stability;
use apivet_core::runner::RuleRunner;
use apivet_core::Fact;
use apivet_rules::helpers::{JSON_API_CONTENT_TYPE, STABILITY_KEY};
use apivet_rules::{standard_rules, RulesetSelection};
use common::*;
use serde_json::{json, Value};

use apivet_core::fact::Location;

fn versioned_headers() -> Value {
    json!({
        "api-request-id": {},
        "deprecation": {},
        "api-version-lifecycle-stage": {},
        "api-version-requested": {},
        "api-version-served": {},
        "sunset": {},
    })
}

fn compliant_facts() -> Vec<Fact> {
    vec![
        Fact::added(Location::Specification, json!({STABILITY_KEY: "beta"})),
        Fact::added(
            operation("get", "/things"),
            json!({
                "operationId": "listThings",
                "summary": "List things",
                "tags": ["Things"],
                "parameters": [
                    {"name": "version", "in": "query"},
                    {"name": "starting_after", "in": "query"},
                    {"name": "ending_before", "in": "query"},
                    {"name": "limit", "in": "query"},
                ],
            }),
        ),
        Fact::added(
            response("get", "/things", "200"),
            json!({
                "headers": versioned_headers(),
                "content": {
                    (JSON_API_CONTENT_TYPE): {
                        "schema": {
                            "properties": {
                                "data": {
                                    "type": "array",
                                    "items": {
                                        "properties": {
                                            "id": {"type": "string", "format": "uuid"},
                                            "type": {"type": "string"},
                                        },
                                    },
                                },
                                "links": {
                                    "properties": {"self": {}},
                                },
                            },
                        },
                    },
                },
            }),
        ),
    ]
}

#[test]
fn a_compliant_collection_resource_passes_every_family() {
    let custom = context(Stability::Beta);
    let results = run(standard_rules(&RulesetSelection::all()), &compliant_facts(), &custom);
    assert!(!results.is_empty());
    let failing: Vec<String> = failures(&results)
        .iter()
        .map(|result| format!("{}: {}", result.rule_name, result.condition))
        .collect();
    assert!(failing.is_empty(), "unexpected failures: {failing:?}");
}

#[test]
fn full_runs_are_deterministic() {
    let custom = context(Stability::Beta);
    let runner = RuleRunner::new(standard_rules(&RulesetSelection::all()));
    let facts = compliant_facts();

    let first = runner.run(&facts, &custom).expect("valid facts");
    let second = runner.run(&facts, &custom).expect("valid facts");
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes"),
    );
}

#[test]
fn one_fact_can_fail_several_families_at_once() {
    let custom = context(Stability::Ga);
    let facts = vec![Fact::added(
        response("get", "/things", "201"),
        json!({"headers": {}, "content": {"application/json": {"schema": {}}}}),
    )];
    let results = run(standard_rules(&RulesetSelection::all()), &facts, &custom);

    let failed_rules: Vec<&str> = failures(&results)
        .iter()
        .map(|result| result.rule_name.as_str())
        .collect();
    // Wrong 2xx code for GET, missing standard headers, and no JSON:API body.
    assert!(failed_rules.contains(&"valid 2xx status codes for get"));
    assert!(failed_rules.contains(&"standard headers"));
    assert!(failed_rules.contains(&"JSON:API content type"));
}

#[test]
fn introspection_paths_are_skipped_across_families() {
    let custom = context(Stability::Ga);
    let facts = vec![Fact::added(
        response("get", "/openapi", "200"),
        json!({"headers": {}, "content": {"application/json": {"schema": {}}}}),
    )];
    let results = run(standard_rules(&RulesetSelection::all()), &facts, &custom);
    assert!(failures(&results).is_empty(), "introspection surface is exempt");
}
