//! The partial-match engine.
//!
//! A [`Pattern`] describes the shape a JSON-like value must contain:
//!
//! - a literal matches by equality;
//! - an object pattern matches any mapping containing **at least** its keys,
//!   recursing per key — extra keys in the actual value are ignored, and the
//!   empty object pattern matches any mapping;
//! - an element pattern (`[M]`) matches a non-empty sequence every element of
//!   which satisfies `M`;
//! - a [`Matcher`] delegates to its predicate.
//!
//! Because the comparison is partial, adding unrelated sibling keys to a
//! matching value never breaks the match.
//!
//! # Example
//!
//! ```
//! use apivet_core::matcher::{any_string, Pattern};
//! use serde_json::json;
//!
//! let pattern = Pattern::object([(
//!     "data",
//!     Pattern::object([("type", Pattern::from(any_string()))]),
//! )]);
//!
//! let body = json!({"data": {"type": "thing", "id": "1234"}, "links": {}});
//! assert!(pattern.matches(&body).ok);
//!
//! let result = pattern.matches(&json!({"data": {}}));
//! assert!(!result.ok);
//! assert_eq!(result.mismatch_path, ["data", "type"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::Matcher;

/// A declarative expected shape for a JSON-like value.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches by equality.
    Literal(Value),
    /// Partial mapping match: at least these keys, recursing per key.
    Object(BTreeMap<String, Pattern>),
    /// Matches a non-empty sequence whose every element satisfies the inner
    /// pattern.
    Each(Box<Pattern>),
    /// Delegates to a [`Matcher`] predicate.
    Test(Matcher),
}

impl Pattern {
    /// Builds an object pattern from key/pattern entries.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, pattern)| (key.into(), pattern))
                .collect(),
        )
    }

    /// The empty object pattern: matches any mapping without constraining its
    /// shape (used to mean "has this key and it is an object").
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(BTreeMap::new())
    }

    /// Builds an element pattern: every element of the sequence must match.
    #[must_use]
    pub fn each(pattern: Self) -> Self {
        Self::Each(Box::new(pattern))
    }

    /// Builds a literal pattern matching by equality.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Compares an actual value against this pattern.
    #[must_use]
    pub fn matches(&self, actual: &Value) -> MatchResult {
        match check(self, actual, &[]) {
            Ok(()) => MatchResult::matched(),
            Err(mismatch) => MatchResult::from_mismatch(&mismatch),
        }
    }

    /// Compares an actual value against a set of alternative patterns.
    ///
    /// Succeeds when any alternative fully partial-matches. The alternatives
    /// are an OR, not independently diagnosable: on failure the aggregate
    /// reason is `expected at least one partial match`, without enumerating
    /// each alternative's mismatch.
    #[must_use]
    pub fn matches_one_of(actual: &Value, alternatives: &[Self]) -> MatchResult {
        if alternatives
            .iter()
            .any(|pattern| pattern.matches(actual).ok)
        {
            MatchResult::matched()
        } else {
            MatchResult {
                ok: false,
                mismatch_path: Vec::new(),
                reason: "expected at least one partial match".to_string(),
            }
        }
    }
}

impl From<Matcher> for Pattern {
    fn from(matcher: Matcher) -> Self {
        Self::Test(matcher)
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<bool> for Pattern {
    fn from(value: bool) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for Pattern {
    fn from(value: i64) -> Self {
        Self::Literal(Value::from(value))
    }
}

/// Outcome of a partial-match comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the actual value satisfied the pattern.
    pub ok: bool,
    /// Key/index trail to the deepest failing pattern node; empty on success
    /// and for one-of failures.
    pub mismatch_path: Vec<String>,
    /// Human-readable diagnostic; empty on success.
    pub reason: String,
}

impl MatchResult {
    fn matched() -> Self {
        Self {
            ok: true,
            mismatch_path: Vec::new(),
            reason: String::new(),
        }
    }

    fn from_mismatch(mismatch: &Mismatch) -> Self {
        let reason = if mismatch.path.is_empty() {
            format!("expected a partial match: {}", mismatch.reason)
        } else {
            format!(
                "expected a partial match: {} at {}",
                mismatch.reason,
                mismatch.path.join("/")
            )
        };
        Self {
            ok: false,
            mismatch_path: mismatch.path.clone(),
            reason,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            f.write_str("matched")
        } else {
            f.write_str(&self.reason)
        }
    }
}

struct Mismatch {
    path: Vec<String>,
    reason: String,
}

impl Mismatch {
    fn at(path: &[String], reason: String) -> Self {
        Self {
            path: path.to_vec(),
            reason,
        }
    }
}

fn check(pattern: &Pattern, actual: &Value, path: &[String]) -> Result<(), Mismatch> {
    if actual.is_null() {
        return Err(Mismatch::at(path, "expected a value".to_string()));
    }

    match pattern {
        Pattern::Literal(expected) => {
            if actual == expected {
                Ok(())
            } else {
                Err(Mismatch::at(path, format!("expected {expected}")))
            }
        },
        Pattern::Test(matcher) => {
            if matcher.test(actual) {
                Ok(())
            } else {
                Err(Mismatch::at(path, format!("expected {}", matcher.label())))
            }
        },
        Pattern::Object(entries) => {
            let Some(object) = actual.as_object() else {
                return Err(Mismatch::at(path, "expected an object".to_string()));
            };
            for (key, sub_pattern) in entries {
                let mut child_path = path.to_vec();
                child_path.push(key.clone());
                match object.get(key) {
                    None => {
                        return Err(Mismatch::at(&child_path, format!("missing key '{key}'")));
                    },
                    Some(value) => check(sub_pattern, value, &child_path)?,
                }
            }
            Ok(())
        },
        Pattern::Each(sub_pattern) => {
            let Some(items) = actual.as_array() else {
                return Err(Mismatch::at(path, "expected an array".to_string()));
            };
            if items.is_empty() {
                return Err(Mismatch::at(path, "expected at least one element".to_string()));
            }
            for (index, item) in items.iter().enumerate() {
                let mut child_path = path.to_vec();
                child_path.push(index.to_string());
                check(sub_pattern, item, &child_path)?;
            }
            Ok(())
        },
    }
}
