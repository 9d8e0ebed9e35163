//! End-to-end runner behavior over synthetic fact lists.

use apivet_core::context::{CustomContext, VersionRef};
use apivet_core::fact::{ChangeKind, Fact, FactKind, Location, OperationLocation};
use apivet_core::lifecycle::Stability;
use apivet_core::matcher::{any_string, Pattern};
use apivet_core::rule::{Rule, Ruleset, Violation};
use apivet_core::runner::{RuleRunner, EXEMPTIONS_KEY};
use serde_json::json;

fn custom_context() -> CustomContext {
    CustomContext {
        change_date: "2024-03-01".parse().expect("valid date"),
        change_resource: "things".to_string(),
        change_version: VersionRef {
            date: "2024-01-01".parse().expect("valid date"),
            stability: Stability::Beta,
        },
        resource_versions: Default::default(),
    }
}

fn operation(method: &str, path: &str) -> Location {
    Location::Operation {
        op: OperationLocation::new(method, path),
    }
}

#[test]
fn results_preserve_fact_then_rule_order() {
    let first = Rule::new("first rule", &[FactKind::Operation], |a| {
        a.requirement("always recorded", |_current| Ok(()));
    });
    let second = Rule::new("second rule", &[FactKind::Operation], |a| {
        a.requirement("always recorded", |_current| {
            Err(Violation::new("always fails"))
        });
    });
    let runner = RuleRunner::new(vec![first.into(), second.into()]);

    let facts = vec![
        Fact::added(operation("get", "/a"), json!({})),
        Fact::added(operation("get", "/b"), json!({})),
    ];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    let order: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.location.as_str(), r.rule_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("GET /a", "first rule"),
            ("GET /a", "second rule"),
            ("GET /b", "first rule"),
            ("GET /b", "second rule"),
        ]
    );
}

#[test]
fn repeated_runs_are_byte_identical() {
    let rule = Rule::new("operation id set", &[FactKind::Operation], |a| {
        let pattern = Pattern::object([("operationId", any_string().into())]);
        a.requirement_matches("operationId must be set and a string", &pattern);
    });
    let runner = RuleRunner::new(vec![rule.into()]);
    let facts = vec![
        Fact::added(operation("get", "/things"), json!({"operationId": "listThings"})),
        Fact::changed(
            operation("post", "/things"),
            json!({}),
            json!({"summary": "no id"}),
        ),
    ];
    let custom = custom_context();

    let first = runner.run(&facts, &custom).expect("valid facts");
    let second = runner.run(&facts, &custom).expect("valid facts");
    let first_encoded = serde_json::to_string(&first).expect("serializes");
    let second_encoded = serde_json::to_string(&second).expect("serializes");
    assert_eq!(first_encoded, second_encoded);
}

#[test]
fn ruleset_predicate_prunes_the_whole_subtree() {
    let inner = Rule::new("inner rule", &[], |a| {
        a.requirement("always recorded", |_current| Ok(()))
    });
    let nested = Ruleset::new(
        "nested",
        vec![Rule::new("nested rule", &[], |a| {
            a.requirement("always recorded", |_current| Ok(()))
        })
        .into()],
    );
    let gated = Ruleset::new("gated", vec![inner.into(), nested.into()]).when(|context| {
        context
            .operation()
            .is_some_and(|op| !op.path.starts_with("/openapi"))
    });
    let runner = RuleRunner::new(vec![gated.into()]);

    let facts = vec![
        Fact::added(operation("get", "/openapi"), json!({})),
        Fact::added(operation("get", "/things"), json!({})),
    ];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    // The introspection path is excluded entirely, nested rules included.
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.location == "GET /things"));
}

#[test]
fn violations_are_local_to_one_assertion() {
    let rule = Rule::new("mixed rule", &[FactKind::Operation], |a| {
        a.requirement("fails", |_current| Err(Violation::new("broken")));
        a.requirement("still runs", |_current| Ok(()));
    });
    let sibling = Rule::new("sibling rule", &[FactKind::Operation], |a| {
        a.requirement("unaffected", |_current| Ok(()));
    });
    let runner = RuleRunner::new(vec![rule.into(), sibling.into()]);

    let facts = vec![
        Fact::added(operation("get", "/a"), json!({})),
        Fact::added(operation("get", "/b"), json!({})),
    ];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    assert_eq!(results.len(), 6);
    let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|r| r.condition == "fails"));
    assert_eq!(failures[0].error.as_deref(), Some("broken"));
}

#[test]
fn docs_link_prefers_rule_over_enclosing_ruleset() {
    let with_own_link = Rule::new("rule with link", &[], |a| {
        a.requirement("recorded", |_current| Ok(()))
    })
    .docs_link("https://docs.example/rule");
    let without_link = Rule::new("rule without link", &[], |a| {
        a.requirement("recorded", |_current| Ok(()))
    });
    let ruleset = Ruleset::new("set", vec![with_own_link.into(), without_link.into()])
        .docs_link("https://docs.example/set");
    let runner = RuleRunner::new(vec![ruleset.into()]);

    let facts = vec![Fact::added(operation("get", "/a"), json!({}))];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    assert_eq!(
        results[0].docs_link.as_deref(),
        Some("https://docs.example/rule")
    );
    assert_eq!(
        results[1].docs_link.as_deref(),
        Some("https://docs.example/set")
    );
}

#[test]
fn operation_change_is_visible_to_parameter_rules() {
    let rule = Rule::new("prevent required additions", &[FactKind::QueryParameter], |a| {
        a.added("not be required", |parameter| {
            if parameter.get("required").and_then(|v| v.as_bool()) == Some(true) {
                return Err(Violation::new("must not be required"));
            }
            Ok(())
        });
    })
    .when(|_fact, context| !context.operation_is_new());
    let runner = RuleRunner::new(vec![rule.into()]);

    let parameter = |path: &str| Location::QueryParameter {
        op: OperationLocation::new("get", path),
        name: "filter".to_string(),
    };

    // The same required-parameter addition on an existing operation fails,
    // on a brand-new operation it produces no result at all.
    let facts = vec![
        Fact::changed(operation("get", "/existing"), json!({}), json!({"x": 1})),
        Fact::added(parameter("/existing"), json!({"name": "filter", "required": true})),
        Fact::added(operation("get", "/new"), json!({})),
        Fact::added(parameter("/new"), json!({"name": "filter", "required": true})),
    ];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].location, "GET /existing query parameter: filter");
    assert!(!results[0].passed);
    assert_eq!(results[0].error.as_deref(), Some("must not be required"));
}

#[test]
fn exempted_failures_are_flagged_but_still_fail() {
    let rule = Rule::new("no put method", &[FactKind::Operation], |a| {
        a.requirement("never passes", |_current| Err(Violation::new("nope")));
    });
    let runner = RuleRunner::new(vec![rule.into()]);

    let facts = vec![
        Fact::added(
            operation("put", "/exempted"),
            json!({(EXEMPTIONS_KEY): ["no put method"]}),
        ),
        Fact::added(operation("put", "/plain"), json!({})),
    ];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");

    assert_eq!(results.len(), 2);
    assert!(!results[0].passed);
    assert!(results[0].exempted);
    assert!(!results[1].passed);
    assert!(!results[1].exempted);
}

#[test]
fn facts_with_no_matching_rules_produce_no_results() {
    let rule = Rule::new("responses only", &[FactKind::Response], |a| {
        a.requirement("recorded", |_current| Ok(()))
    });
    let runner = RuleRunner::new(vec![rule.into()]);

    let facts = vec![Fact::added(operation("get", "/things"), json!({}))];
    let results = runner.run(&facts, &custom_context()).expect("valid facts");
    assert!(results.is_empty());
}

#[test]
fn invalid_facts_are_rejected_before_any_rule_runs() {
    let rule = Rule::new("any", &[], |a| {
        a.requirement("recorded", |_current| Ok(()))
    });
    let runner = RuleRunner::new(vec![rule.into()]);

    let mut bad = Fact::added(operation("get", "/things"), json!({}));
    bad.change = ChangeKind::Removed;
    let err = runner
        .run(&[bad], &custom_context())
        .expect_err("payload shape is invalid");
    assert!(err.to_string().contains("removed fact"));
}
