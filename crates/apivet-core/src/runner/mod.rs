//! The rule runner: facts × rules → ordered results.
//!
//! [`RuleRunner::run`] processes each fact in input order, walks the rule
//! tree depth-first, prunes subtrees whose ruleset predicate rejects the
//! fact's context, and invokes the body of every reachable rule whose own
//! predicate matches. Each assertion view that fires produces one
//! [`CheckResult`].
//!
//! # Ordering
//!
//! Results preserve the order facts were supplied in, and within a fact the
//! order rules matched during the depth-first traversal. The ordering is
//! stable and reproducible for identical input, which snapshot-style
//! regression testing relies on.
//!
//! # Failure Semantics
//!
//! A [`Violation`](crate::rule::Violation) is local: it fails exactly one
//! assertion and never affects sibling rules or other facts. Anything else
//! raised from a rule body — an index into an absent field, an arithmetic
//! overflow — is a rule-authoring bug and propagates as a panic rather than
//! being masked as a result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::context::{CustomContext, RuleContext};
use crate::fact::{ChangeKind, Fact, FactError, Location};
use crate::rule::{Assertions, Rule, RuleNode, Ruleset};

/// Extension key a payload uses to exempt itself from named rules.
pub const EXEMPTIONS_KEY: &str = "x-apivet-exemptions";

/// One pass/fail record for a (fact, rule, assertion) evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Name of the rule that produced this result.
    pub rule_name: String,
    /// Human-readable location of the fact, for display.
    #[serde(rename = "where")]
    pub location: String,
    /// The assertion's condition label.
    pub condition: String,
    /// Whether the assertion passed.
    pub passed: bool,
    /// On failure, a message intended for direct display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Documentation link from the rule or its nearest enclosing ruleset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_link: Option<String>,
    /// Whether a failure was exempted by the fact's payload.
    #[serde(default)]
    pub exempted: bool,
}

/// Drives rule evaluation over a fact list.
///
/// The runner holds only the immutable rule tree; every run allocates its
/// own contexts and results, so one runner may serve concurrent runs.
#[derive(Debug)]
pub struct RuleRunner {
    rules: Vec<RuleNode>,
}

impl RuleRunner {
    /// Creates a runner over the given rule tree.
    #[must_use]
    pub fn new(rules: Vec<RuleNode>) -> Self {
        Self { rules }
    }

    /// Evaluates every applicable rule against every fact, in order.
    ///
    /// A fact with no matching rules simply produces no results; a rule tree
    /// whose top-level predicates reject every fact yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`FactError`] when a fact breaks the change-kind/payload
    /// invariant. No rule runs in that case.
    pub fn run(
        &self,
        facts: &[Fact],
        custom: &CustomContext,
    ) -> Result<Vec<CheckResult>, FactError> {
        for fact in facts {
            fact.validate()?;
        }

        let operation_changes = operation_change_index(facts);
        let mut results = Vec::new();

        for fact in facts {
            let operation_change = fact
                .location
                .operation()
                .and_then(|op| operation_changes.get(&(op.method.as_str(), op.path.as_str())))
                .copied();
            let context = RuleContext {
                location: &fact.location,
                operation_change,
                custom,
            };
            for node in &self.rules {
                visit(node, fact, &context, None, &mut results);
            }
        }

        Ok(results)
    }
}

/// Change kind of every operation fact, keyed by (method, path).
fn operation_change_index<'a>(facts: &'a [Fact]) -> BTreeMap<(&'a str, &'a str), ChangeKind> {
    facts
        .iter()
        .filter_map(|fact| match &fact.location {
            Location::Operation { op } => {
                Some(((op.method.as_str(), op.path.as_str()), fact.change))
            },
            _ => None,
        })
        .collect()
}

fn visit(
    node: &RuleNode,
    fact: &Fact,
    context: &RuleContext<'_>,
    inherited_link: Option<&'static str>,
    results: &mut Vec<CheckResult>,
) {
    match node {
        RuleNode::Ruleset(ruleset) => visit_ruleset(ruleset, fact, context, inherited_link, results),
        RuleNode::Rule(rule) => visit_rule(rule, fact, context, inherited_link, results),
    }
}

fn visit_ruleset(
    ruleset: &Ruleset,
    fact: &Fact,
    context: &RuleContext<'_>,
    inherited_link: Option<&'static str>,
    results: &mut Vec<CheckResult>,
) {
    // Prune the whole subtree: children of a non-matching ruleset are never
    // evaluated for this fact.
    if !ruleset.applies_to(context) {
        debug!(ruleset = ruleset.name(), location = %fact.location, "ruleset pruned");
        return;
    }
    let link = ruleset.link().or(inherited_link);
    for child in ruleset.rules() {
        visit(child, fact, context, link, results);
    }
}

fn visit_rule(
    rule: &Rule,
    fact: &Fact,
    context: &RuleContext<'_>,
    inherited_link: Option<&'static str>,
    results: &mut Vec<CheckResult>,
) {
    if !rule.applies_to(fact, context) {
        return;
    }
    debug!(rule = rule.name(), location = %fact.location, "evaluating rule");

    let mut assertions = Assertions::new(fact, context);
    rule.run_body(&mut assertions);

    let docs_link = rule.link().or(inherited_link);
    for outcome in assertions.into_outcomes() {
        let (passed, error) = match outcome.result {
            Ok(()) => (true, None),
            Err(violation) => (false, Some(violation.message().to_string())),
        };
        let exempted = !passed && payload_exempts(fact.current(), rule.name());
        if !passed {
            debug!(
                rule = rule.name(),
                location = %fact.location,
                exempted,
                error = error.as_deref().unwrap_or_default(),
                "rule violation"
            );
        }
        results.push(CheckResult {
            rule_name: rule.name().to_string(),
            location: fact.location.to_string(),
            condition: outcome.condition,
            passed,
            error,
            docs_link: docs_link.map(str::to_string),
            exempted,
        });
    }
}

/// Whether a payload exempts itself from the named rule via
/// [`EXEMPTIONS_KEY`] (a string or an array of strings).
fn payload_exempts(payload: Option<&Value>, rule_name: &str) -> bool {
    let Some(Value::Object(object)) = payload else {
        return false;
    };
    match object.get(EXEMPTIONS_KEY) {
        Some(Value::String(name)) => name == rule_name,
        Some(Value::Array(names)) => names
            .iter()
            .any(|name| name.as_str() == Some(rule_name)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn exemptions_accept_string_or_array() {
        let single = json!({(EXEMPTIONS_KEY): "rule a"});
        assert!(payload_exempts(Some(&single), "rule a"));
        assert!(!payload_exempts(Some(&single), "rule b"));

        let several = json!({(EXEMPTIONS_KEY): ["rule a", "rule b"]});
        assert!(payload_exempts(Some(&several), "rule b"));

        assert!(!payload_exempts(Some(&json!({})), "rule a"));
        assert!(!payload_exempts(None, "rule a"));
        assert!(!payload_exempts(Some(&json!("not an object")), "rule a"));
    }

    #[test]
    fn check_result_serializes_where_key() {
        let result = CheckResult {
            rule_name: "operation id".to_string(),
            location: "GET /example".to_string(),
            condition: "have an operation id".to_string(),
            passed: false,
            error: Some("missing key 'operationId'".to_string()),
            docs_link: None,
            exempted: false,
        };
        let encoded = serde_json::to_string(&result).expect("serializes");
        assert!(encoded.contains("\"where\":\"GET /example\""));
        assert!(encoded.contains("\"ruleName\":\"operation id\""));
        assert!(!encoded.contains("docsLink"));
    }
}
