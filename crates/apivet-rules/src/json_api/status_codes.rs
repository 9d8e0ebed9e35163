//! Allowed status code sets per method.

use apivet_core::fact::FactKind;
use apivet_core::rule::{Rule, Ruleset, Violation};

use crate::helpers::{method_is, outside_openapi, response_status};
use crate::links;

const RESPONSE: &[FactKind] = &[FactKind::Response];

/// 4xx codes a JSON:API operation may declare.
pub const ALLOWED_4XX_CODES: &[&str] = &["400", "401", "403", "404", "409", "410", "429"];

/// 2xx codes a POST operation may declare.
pub const VALID_POST_2XX_CODES: &[&str] = &["201", "202", "204"];

/// 2xx codes a DELETE operation may declare.
pub const VALID_DELETE_2XX_CODES: &[&str] = &["200", "204"];

/// The JSON:API status code rule family.
#[must_use]
pub fn status_code_rules() -> Ruleset {
    Ruleset::new(
        "JSON:API status codes",
        vec![
            valid_4xx_codes().into(),
            delete_2xx_codes().into(),
            post_2xx_codes().into(),
            get_2xx_codes().into(),
        ],
    )
    .docs_link(links::standards::STATUS_CODES)
    .when(outside_openapi)
}

/// Registers the same status-code check on the added and changed views.
fn check_status(
    a: &mut apivet_core::rule::Assertions<'_>,
    condition: &str,
    status: String,
    check: impl Fn(&str) -> Result<(), Violation> + Clone + 'static,
) {
    let added_status = status.clone();
    let added_check = check.clone();
    a.added(condition, move |_response| added_check(&added_status));
    a.changed(condition, move |_before, _after| check(&status));
}

fn valid_4xx_codes() -> Rule {
    Rule::new("valid 4xx status codes", RESPONSE, |a| {
        let status = response_status(a.fact()).unwrap_or_default().to_string();
        check_status(a, "support the correct 4xx status codes", status, |status| {
            if !ALLOWED_4XX_CODES.contains(&status) {
                return Err(Violation::new(format!(
                    "expected response to not support status code {status}"
                )));
            }
            Ok(())
        });
    })
    .when(|fact, _context| response_status(fact).is_some_and(|s| s.starts_with('4')))
}

fn delete_2xx_codes() -> Rule {
    Rule::new("valid 2xx status codes for delete", RESPONSE, |a| {
        let status = response_status(a.fact()).unwrap_or_default().to_string();
        check_status(a, "support the correct 2xx status codes", status, |status| {
            if !VALID_DELETE_2XX_CODES.contains(&status) {
                return Err(Violation::new(format!(
                    "expected response to not support status code {status}"
                )));
            }
            Ok(())
        });
    })
    .when(|fact, context| {
        method_is(context, "delete") && response_status(fact).is_some_and(|s| s.starts_with('2'))
    })
}

fn post_2xx_codes() -> Rule {
    Rule::new("valid 2xx status codes for post", RESPONSE, |a| {
        let status = response_status(a.fact()).unwrap_or_default().to_string();
        check_status(a, "support the correct 2xx status codes", status, |status| {
            if !VALID_POST_2XX_CODES.contains(&status) {
                return Err(Violation::new(format!(
                    "expected POST response to only support status code(s) \
                     {{201,202,204}}, not {status}"
                )));
            }
            Ok(())
        });
    })
    .when(|fact, context| {
        method_is(context, "post") && response_status(fact).is_some_and(|s| s.starts_with('2'))
    })
}

fn get_2xx_codes() -> Rule {
    Rule::new("valid 2xx status codes for get", RESPONSE, |a| {
        let status = response_status(a.fact()).unwrap_or_default().to_string();
        check_status(a, "support the correct 2xx status codes", status, |status| {
            if status != "200" {
                return Err(Violation::new(format!(
                    "expected GET response to only support 200, not {status}"
                )));
            }
            Ok(())
        });
    })
    .when(|fact, context| {
        method_is(context, "get") && response_status(fact).is_some_and(|s| s.starts_with('2'))
    })
}
