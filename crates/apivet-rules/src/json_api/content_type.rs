//! The JSON:API content type requirement.

use apivet_core::fact::FactKind;
use apivet_core::rule::{Rule, Violation};
use serde_json::Value;

use crate::helpers::{has_content_type, outside_openapi, response_status, JSON_API_CONTENT_TYPE};
use crate::links;

const RESPONSE: &[FactKind] = &[FactKind::Response];

fn content_type_check(response: &Value) -> Result<(), Violation> {
    if !has_content_type(response, JSON_API_CONTENT_TYPE) {
        return Err(Violation::new(format!(
            "expected response to support {JSON_API_CONTENT_TYPE}"
        )));
    }
    Ok(())
}

/// Every non-204 response outside the introspection surface must offer the
/// JSON:API media type.
#[must_use]
pub fn content_type_rule() -> Rule {
    Rule::new("JSON:API content type", RESPONSE, |a| {
        a.added("use the JSON:API content type", content_type_check);
        a.changed("use the JSON:API content type", |_before, after| {
            content_type_check(after)
        });
    })
    .docs_link(links::json_api::CONTENT_TYPE)
    .when(|fact, context| outside_openapi(context) && response_status(fact) != Some("204"))
}
