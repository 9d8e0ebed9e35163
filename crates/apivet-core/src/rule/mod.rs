//! Rules and rulesets: declarative policy units as data, not inheritance.
//!
//! A [`Rule`] is a named record holding an optional applicability predicate
//! and one assertion body. A [`Ruleset`] is an ordered, named group of rules
//! sharing an applicability predicate; rulesets nest, forming a filtering
//! tree in which a parent's predicate gates whether children are even
//! considered.
//!
//! Rules and rulesets own no mutable state. A tree is constructed once at
//! startup, treated as immutable configuration, and may be shared across
//! concurrent runner invocations — every closure is `Send + Sync`.
//!
//! # Example
//!
//! ```
//! use apivet_core::fact::FactKind;
//! use apivet_core::rule::{Rule, Ruleset, Violation};
//!
//! let no_put = Rule::new(
//!     "no put method",
//!     &[FactKind::Operation],
//!     |assertions| {
//!         let method = assertions
//!             .context()
//!             .operation()
//!             .map(|op| op.method.clone());
//!         assertions.added("not use put method", move |_operation| {
//!             if method.as_deref() == Some("put") {
//!                 return Err(Violation::new("put is not allowed"));
//!             }
//!             Ok(())
//!         });
//!     },
//! );
//!
//! let ruleset = Ruleset::new("operation rules", vec![no_put.into()]);
//! assert_eq!(ruleset.rules().len(), 1);
//! ```

mod assertions;

use std::fmt;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::fact::{Fact, FactKind};
use crate::matcher::MatchResult;

pub use assertions::Assertions;
pub(crate) use assertions::AssertionOutcome;

/// A deliberate policy violation raised by an assertion body.
///
/// Violations are control flow, not errors: they terminate exactly one
/// assertion callback and are converted into a failing result at the runner
/// boundary. They carry only the message the rule author supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    message: String,
}

impl Violation {
    /// Creates a violation with the given display message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The display message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<MatchResult> for Violation {
    fn from(result: MatchResult) -> Self {
        Self::new(result.to_string())
    }
}

type RuleBody = Arc<dyn Fn(&mut Assertions<'_>) + Send + Sync>;
type FactPredicate = Arc<dyn Fn(&Fact, &RuleContext<'_>) -> bool + Send + Sync>;
type ContextPredicate = Arc<dyn Fn(&RuleContext<'_>) -> bool + Send + Sync>;

/// A named policy unit: applicability predicate plus one assertion body.
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    docs_link: Option<&'static str>,
    kinds: &'static [FactKind],
    matches: Option<FactPredicate>,
    body: RuleBody,
}

impl Rule {
    /// Creates a rule that applies to facts of the given kinds.
    ///
    /// An empty kind slice applies the rule to every fact kind. The body is
    /// invoked once per matching fact with the assertion views bound to that
    /// fact.
    pub fn new(
        name: &'static str,
        kinds: &'static [FactKind],
        body: impl Fn(&mut Assertions<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            docs_link: None,
            kinds,
            matches: None,
            body: Arc::new(body),
        }
    }

    /// Attaches a documentation link surfaced on this rule's results.
    #[must_use]
    pub fn docs_link(mut self, link: &'static str) -> Self {
        self.docs_link = Some(link);
        self
    }

    /// Restricts the rule to facts for which the predicate holds.
    #[must_use]
    pub fn when(
        mut self,
        predicate: impl Fn(&Fact, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.matches = Some(Arc::new(predicate));
        self
    }

    /// The rule's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The rule's own documentation link, if declared.
    #[must_use]
    pub const fn link(&self) -> Option<&'static str> {
        self.docs_link
    }

    pub(crate) fn applies_to(&self, fact: &Fact, context: &RuleContext<'_>) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&fact.kind()))
            && self
                .matches
                .as_ref()
                .is_none_or(|predicate| predicate(fact, context))
    }

    pub(crate) fn run_body(&self, assertions: &mut Assertions<'_>) {
        (self.body)(assertions);
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

/// An ordered, named group of rules sharing an applicability predicate.
#[derive(Clone)]
pub struct Ruleset {
    name: &'static str,
    docs_link: Option<&'static str>,
    matches: Option<ContextPredicate>,
    rules: Vec<RuleNode>,
}

impl Ruleset {
    /// Creates a ruleset from its child nodes, in evaluation order.
    #[must_use]
    pub fn new(name: &'static str, rules: Vec<RuleNode>) -> Self {
        Self {
            name,
            docs_link: None,
            matches: None,
            rules,
        }
    }

    /// Attaches a documentation link inherited by child rules that declare
    /// none of their own.
    #[must_use]
    pub fn docs_link(mut self, link: &'static str) -> Self {
        self.docs_link = Some(link);
        self
    }

    /// Gates the whole subtree: when the predicate is false for a fact's
    /// context, no child rule or nested ruleset is evaluated for that fact.
    #[must_use]
    pub fn when(
        mut self,
        predicate: impl Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.matches = Some(Arc::new(predicate));
        self
    }

    /// The ruleset's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The ruleset's own documentation link, if declared.
    #[must_use]
    pub const fn link(&self) -> Option<&'static str> {
        self.docs_link
    }

    /// The child nodes, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RuleNode] {
        &self.rules
    }

    pub(crate) fn applies_to(&self, context: &RuleContext<'_>) -> bool {
        self.matches
            .as_ref()
            .is_none_or(|predicate| predicate(context))
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

/// One node of a rule tree: a leaf rule or a nested ruleset.
#[derive(Debug, Clone)]
pub enum RuleNode {
    /// A leaf rule.
    Rule(Rule),
    /// A nested ruleset.
    Ruleset(Ruleset),
}

impl From<Rule> for RuleNode {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<Ruleset> for RuleNode {
    fn from(ruleset: Ruleset) -> Self {
        Self::Ruleset(ruleset)
    }
}
