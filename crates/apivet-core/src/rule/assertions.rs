//! Assertion views bound to one fact.
//!
//! A rule body receives an [`Assertions`] value exposing four views of the
//! fact under evaluation:
//!
//! - [`added`](Assertions::added) — fires only for added facts, with the
//!   after payload;
//! - [`changed`](Assertions::changed) — fires only for changed facts, with
//!   the before and after payloads;
//! - [`removed`](Assertions::removed) — fires only for removed facts, with
//!   the before payload;
//! - [`requirement`](Assertions::requirement) — fires unconditionally
//!   against the current payload (after when present, otherwise before),
//!   for "must always hold" structural checks independent of diffing.
//!
//! A body may register any number of views; each view that actually fires
//! produces its own independent pass/fail result. Callbacks signal a policy
//! violation by returning `Err(Violation)`; completing normally means pass.

use serde_json::Value;

use super::Violation;
use crate::context::RuleContext;
use crate::fact::{ChangeKind, Fact};
use crate::matcher::{MatchResult, Pattern};

/// One fired assertion: its condition label and pass/fail outcome.
#[derive(Debug, Clone)]
pub(crate) struct AssertionOutcome {
    pub(crate) condition: String,
    pub(crate) result: Result<(), Violation>,
}

/// The assertion views a rule body registers its checks against.
#[derive(Debug)]
pub struct Assertions<'a> {
    fact: &'a Fact,
    context: &'a RuleContext<'a>,
    outcomes: Vec<AssertionOutcome>,
}

impl<'a> Assertions<'a> {
    pub(crate) fn new(fact: &'a Fact, context: &'a RuleContext<'a>) -> Self {
        Self {
            fact,
            context,
            outcomes: Vec::new(),
        }
    }

    /// The fact under evaluation.
    #[must_use]
    pub const fn fact(&self) -> &'a Fact {
        self.fact
    }

    /// The read-only rule context for this fact.
    #[must_use]
    pub const fn context(&self) -> &'a RuleContext<'a> {
        self.context
    }

    /// Runs `check` against the after payload of an added fact.
    pub fn added(
        &mut self,
        condition: &str,
        check: impl FnOnce(&Value) -> Result<(), Violation>,
    ) {
        if self.fact.change == ChangeKind::Added {
            if let Some(after) = self.fact.after.as_ref() {
                let result = check(after);
                self.record(condition, result);
            }
        }
    }

    /// Runs `check` against the before and after payloads of a changed fact.
    pub fn changed(
        &mut self,
        condition: &str,
        check: impl FnOnce(&Value, &Value) -> Result<(), Violation>,
    ) {
        if self.fact.change == ChangeKind::Changed {
            if let (Some(before), Some(after)) =
                (self.fact.before.as_ref(), self.fact.after.as_ref())
            {
                let result = check(before, after);
                self.record(condition, result);
            }
        }
    }

    /// Runs `check` against the before payload of a removed fact.
    pub fn removed(
        &mut self,
        condition: &str,
        check: impl FnOnce(&Value) -> Result<(), Violation>,
    ) {
        if self.fact.change == ChangeKind::Removed {
            if let Some(before) = self.fact.before.as_ref() {
                let result = check(before);
                self.record(condition, result);
            }
        }
    }

    /// Runs `check` against the current payload regardless of change kind.
    pub fn requirement(
        &mut self,
        condition: &str,
        check: impl FnOnce(&Value) -> Result<(), Violation>,
    ) {
        if let Some(current) = self.fact.current() {
            let result = check(current);
            self.record(condition, result);
        }
    }

    /// Asserts the after payload of an added fact partial-matches `pattern`.
    pub fn added_matches(&mut self, condition: &str, pattern: &Pattern) {
        self.added(condition, |after| to_result(pattern.matches(after)));
    }

    /// Asserts the after payload of a changed fact partial-matches `pattern`.
    pub fn changed_matches(&mut self, condition: &str, pattern: &Pattern) {
        self.changed(condition, |_before, after| to_result(pattern.matches(after)));
    }

    /// Asserts the current payload partial-matches `pattern`.
    pub fn requirement_matches(&mut self, condition: &str, pattern: &Pattern) {
        self.requirement(condition, |current| to_result(pattern.matches(current)));
    }

    /// Asserts the after payload of an added fact partial-matches one of
    /// `alternatives`.
    pub fn added_matches_one_of(&mut self, condition: &str, alternatives: &[Pattern]) {
        self.added(condition, |after| {
            to_result(Pattern::matches_one_of(after, alternatives))
        });
    }

    /// Asserts the after payload of a changed fact partial-matches one of
    /// `alternatives`.
    pub fn changed_matches_one_of(&mut self, condition: &str, alternatives: &[Pattern]) {
        self.changed(condition, |_before, after| {
            to_result(Pattern::matches_one_of(after, alternatives))
        });
    }

    /// Asserts the current payload partial-matches one of `alternatives`.
    pub fn requirement_matches_one_of(&mut self, condition: &str, alternatives: &[Pattern]) {
        self.requirement(condition, |current| {
            to_result(Pattern::matches_one_of(current, alternatives))
        });
    }

    pub(crate) fn into_outcomes(self) -> Vec<AssertionOutcome> {
        self.outcomes
    }

    fn record(&mut self, condition: &str, result: Result<(), Violation>) {
        self.outcomes.push(AssertionOutcome {
            condition: condition.to_string(),
            result,
        });
    }
}

fn to_result(result: MatchResult) -> Result<(), Violation> {
    if result.ok {
        Ok(())
    } else {
        Err(Violation::from(result))
    }
}
