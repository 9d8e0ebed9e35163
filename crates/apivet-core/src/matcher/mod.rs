//! Reusable value predicates for partial-match patterns.
//!
//! A [`Matcher`] wraps a predicate over a single JSON value together with a
//! diagnostic label used in mismatch reasons. Matchers carry no state and are
//! freely shared: a pattern built once at startup can be evaluated from any
//! number of concurrent runs.

mod partial;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use partial::{MatchResult, Pattern};

/// A labeled predicate over a single value.
#[derive(Clone)]
pub struct Matcher {
    label: String,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Matcher {
    /// Creates a matcher from a diagnostic label and a predicate.
    ///
    /// The label completes the sentence "expected ...", e.g. `"a string"` or
    /// `"uuid, uri or ulid format"`.
    pub fn new(
        label: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// The diagnostic label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Applies the predicate to a value.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Matches any JSON string.
#[must_use]
pub fn any_string() -> Matcher {
    Matcher::new("a string", Value::is_string)
}

/// Matches any JSON number.
#[must_use]
pub fn any_number() -> Matcher {
    Matcher::new("a number", Value::is_number)
}

/// Matches any JSON boolean.
#[must_use]
pub fn any_boolean() -> Matcher {
    Matcher::new("a boolean", Value::is_boolean)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stock_matchers_test_their_type() {
        assert!(any_string().test(&json!("s")));
        assert!(!any_string().test(&json!(1)));
        assert!(any_number().test(&json!(1.5)));
        assert!(!any_number().test(&json!("1.5")));
        assert!(any_boolean().test(&json!(true)));
        assert!(!any_boolean().test(&json!(null)));
    }

    #[test]
    fn custom_matcher_reports_its_label() {
        let uuid_like = Matcher::new("uuid format", |value| {
            value.as_str().is_some_and(|s| s == "uuid")
        });
        assert_eq!(uuid_like.label(), "uuid format");
        assert!(uuid_like.test(&json!("uuid")));
        assert!(!uuid_like.test(&json!("date-time")));
    }
}
