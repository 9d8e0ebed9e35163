//! Shared fact and context builders for the ruleset suites.
#![allow(dead_code)] // Each suite uses its own subset of the builders.

use apivet_core::context::{CustomContext, ResourceVersions, VersionDeprecation, VersionRef};
use apivet_core::fact::{BodyAnchor, Location, OperationLocation};
use apivet_core::lifecycle::Stability;
use apivet_core::rule::RuleNode;
use apivet_core::runner::{CheckResult, RuleRunner};
use apivet_core::Fact;
use chrono::NaiveDate;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

/// A context for a change landing well after the version was published.
pub fn context(stability: Stability) -> CustomContext {
    context_between(stability, "2024-01-01", "2024-03-01")
}

pub fn context_between(
    stability: Stability,
    version_date: &str,
    change_date: &str,
) -> CustomContext {
    CustomContext {
        change_date: date(change_date),
        change_resource: "things".to_string(),
        change_version: VersionRef {
            date: date(version_date),
            stability,
        },
        resource_versions: ResourceVersions::default(),
    }
}

/// Marks the context's own (resource, version, stability) key as deprecated.
pub fn deprecate(custom: &mut CustomContext) {
    let version = custom.change_version;
    custom.resource_versions.insert(
        custom.change_resource.clone(),
        version.date,
        version.stability,
        VersionDeprecation {
            deprecated_by: Some(VersionRef {
                date: custom.change_date,
                stability: version.stability,
            }),
        },
    );
}

pub fn operation(method: &str, path: &str) -> Location {
    Location::Operation {
        op: OperationLocation::new(method, path),
    }
}

pub fn response(method: &str, path: &str, status: &str) -> Location {
    Location::Response {
        op: OperationLocation::new(method, path),
        status_code: status.to_string(),
    }
}

pub fn response_header(method: &str, path: &str, status: &str, name: &str) -> Location {
    Location::ResponseHeader {
        op: OperationLocation::new(method, path),
        status_code: status.to_string(),
        name: name.to_string(),
    }
}

pub fn request(method: &str, path: &str, content_type: &str) -> Location {
    Location::Request {
        op: OperationLocation::new(method, path),
        content_type: content_type.to_string(),
    }
}

pub fn query_parameter(method: &str, path: &str, name: &str) -> Location {
    Location::QueryParameter {
        op: OperationLocation::new(method, path),
        name: name.to_string(),
    }
}

pub fn path_parameter(method: &str, path: &str, name: &str) -> Location {
    Location::PathParameter {
        op: OperationLocation::new(method, path),
        name: name.to_string(),
    }
}

pub fn request_property(method: &str, path: &str, trail: &[&str]) -> Location {
    Location::Property {
        op: OperationLocation::new(method, path),
        body: BodyAnchor::request("application/vnd.api+json"),
        trail: trail.iter().map(ToString::to_string).collect(),
    }
}

pub fn response_property(method: &str, path: &str, status: &str, trail: &[&str]) -> Location {
    Location::Property {
        op: OperationLocation::new(method, path),
        body: BodyAnchor::response(status, "application/vnd.api+json"),
        trail: trail.iter().map(ToString::to_string).collect(),
    }
}

pub fn run(rules: Vec<RuleNode>, facts: &[Fact], custom: &CustomContext) -> Vec<CheckResult> {
    RuleRunner::new(rules)
        .run(facts, custom)
        .expect("facts are valid")
}

pub fn failures(results: &[CheckResult]) -> Vec<&CheckResult> {
    results.iter().filter(|result| !result.passed).collect()
}

pub fn results_for<'a>(results: &'a [CheckResult], rule_name: &str) -> Vec<&'a CheckResult> {
    results
        .iter()
        .filter(|result| result.rule_name == rule_name)
        .collect()
}
