//! Compatibility-rule engine for evolving structured API descriptions.
//!
//! Given a "before" and "after" description of an API surface — expressed as
//! a list of granular [`Fact`]s, one per operation, parameter, header,
//! response, and body property, each tagged added/changed/removed/unchanged —
//! the engine evaluates a declarative tree of [`Rule`]s and produces ordered
//! pass/fail [`CheckResult`]s with human-readable diagnostics.
//!
//! The engine does not parse documents, compute diffs, or resolve source
//! locations; those are external collaborators. It receives facts plus a
//! [`CustomContext`] and returns results.
//!
//! # Components
//!
//! - [`matcher`] — partial-match schema engine: compares actual
//!   JSON-schema-shaped values against declarative expected patterns with
//!   wildcard predicates and one-of alternation.
//! - [`fact`] — the external data contract: locations, change kinds,
//!   before/after payloads.
//! - [`rule`] — rules and nestable rulesets as plain records holding
//!   closures, with assertion views bound to each fact.
//! - [`runner`] — dispatch: routes facts to applicable rules, converts
//!   violations into results, guarantees stable ordering.
//! - [`lifecycle`] — stability transitions and sunset (deprecation notice)
//!   scheduling from calendar dates.
//!
//! # Example
//!
//! ```
//! use apivet_core::context::{CustomContext, VersionRef};
//! use apivet_core::fact::{Fact, FactKind, Location, OperationLocation};
//! use apivet_core::lifecycle::Stability;
//! use apivet_core::matcher::{any_string, Pattern};
//! use apivet_core::rule::Rule;
//! use apivet_core::runner::RuleRunner;
//! use serde_json::json;
//!
//! let operation_id = Pattern::object([("operationId", any_string().into())]);
//! let rule = Rule::new("operation id set", &[FactKind::Operation], move |a| {
//!     a.requirement_matches("operationId must be set and a string", &operation_id);
//! });
//!
//! let runner = RuleRunner::new(vec![rule.into()]);
//! let facts = vec![Fact::added(
//!     Location::Operation {
//!         op: OperationLocation::new("get", "/things"),
//!     },
//!     json!({"summary": "List things"}),
//! )];
//! let custom = CustomContext {
//!     change_date: "2024-03-01".parse().unwrap(),
//!     change_resource: "things".into(),
//!     change_version: VersionRef {
//!         date: "2024-01-01".parse().unwrap(),
//!         stability: Stability::Beta,
//!     },
//!     resource_versions: Default::default(),
//! };
//!
//! let results = runner.run(&facts, &custom).unwrap();
//! assert_eq!(results.len(), 1);
//! assert!(!results[0].passed);
//! ```
//!
//! # Concurrency
//!
//! Evaluation is single-threaded and synchronous by design: one fact is
//! fully processed before the next begins, and deterministic result ordering
//! depends on it. The rule tree itself — including every matcher — is
//! immutable after construction and `Send + Sync`, so a host may share one
//! tree across threads and run independent fact lists in parallel.

pub mod context;
pub mod fact;
pub mod lifecycle;
pub mod matcher;
pub mod rule;
pub mod runner;

pub use context::{CustomContext, ResourceVersions, RuleContext, VersionDeprecation, VersionRef};
pub use fact::{BodyAnchor, ChangeKind, Fact, FactError, FactKind, Location, OperationLocation};
pub use lifecycle::{is_allowed_transition, is_valid_stability, Stability, StabilityError};
pub use matcher::{MatchResult, Matcher, Pattern};
pub use rule::{Assertions, Rule, RuleNode, Ruleset, Violation};
pub use runner::{CheckResult, RuleRunner};
