//! JSON:API convention rules: status codes, content type, resource object
//! shapes, and pagination.

mod content_type;
mod pagination;
mod resource_objects;
mod status_codes;

pub use content_type::content_type_rule;
pub use pagination::{pagination_rules, PAGINATION_QUERY_PARAMETERS};
pub use resource_objects::resource_object_rules;
pub use status_codes::status_code_rules;
