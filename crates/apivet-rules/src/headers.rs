//! Response header rules: naming and the standard versioning header set.

use apivet_core::fact::{Fact, FactKind, Location};
use apivet_core::rule::{Rule, Ruleset, Violation};

use crate::helpers::{has_response_header, is_kebab_case, outside_openapi};
use crate::links;

const RESPONSE: &[FactKind] = &[FactKind::Response];
const RESPONSE_HEADER: &[FactKind] = &[FactKind::ResponseHeader];

/// Headers every response must declare so clients can follow a version's
/// lifecycle.
pub const STANDARD_RESPONSE_HEADERS: &[&str] = &[
    "api-request-id",
    "deprecation",
    "api-version-lifecycle-stage",
    "api-version-requested",
    "api-version-served",
    "sunset",
];

/// The response header rule family.
#[must_use]
pub fn response_header_rules() -> Ruleset {
    Ruleset::new(
        "response header rules",
        vec![header_name_case().into(), standard_headers().into()],
    )
}

fn header_name(fact: &Fact) -> String {
    match &fact.location {
        Location::ResponseHeader { name, .. } => name.clone(),
        _ => String::new(),
    }
}

fn kebab_check(name: &str) -> Result<(), Violation> {
    if !is_kebab_case(name) {
        return Err(Violation::new(format!("{name} is not kebab-case")));
    }
    Ok(())
}

fn header_name_case() -> Rule {
    Rule::new("header case", RESPONSE_HEADER, |a| {
        let name = header_name(a.fact());
        let changed_name = name.clone();
        a.added("be kebab-case", move |_header| kebab_check(&name));
        a.changed("be kebab-case", move |_before, _after| {
            kebab_check(&changed_name)
        });
    })
    .docs_link(links::standards::HEADERS)
}

fn standard_headers() -> Rule {
    Rule::new("standard headers", RESPONSE, |a| {
        a.requirement("include standard versioning headers", |response| {
            for name in STANDARD_RESPONSE_HEADERS {
                if !has_response_header(response, name) {
                    return Err(Violation::new(format!(
                        "expected response to have header {name}"
                    )));
                }
            }
            Ok(())
        });
    })
    .docs_link(links::versioning::RESPONSE_HEADERS)
    .when(|_fact, context| outside_openapi(context))
}
