//! Documentation links surfaced on rule results.

/// API standards documentation.
pub mod standards {
    /// Operation id naming standard.
    pub const OPERATION_IDS: &str = "https://apivet.dev/docs/standards#operation-ids";
    /// Tag requirements.
    pub const TAGS: &str = "https://apivet.dev/docs/standards#tags";
    /// Operation summary requirements.
    pub const OPERATION_SUMMARY: &str = "https://apivet.dev/docs/standards#operation-summary";
    /// Parameter name and path component casing.
    pub const PARAMETER_NAMES_PATH_COMPONENTS: &str =
        "https://apivet.dev/docs/standards#parameter-names-path-components";
    /// Tenant resource formatting.
    pub const TENANT_RESOURCES: &str = "https://apivet.dev/docs/standards#tenant-resources";
    /// Property format standards.
    pub const FORMATS: &str = "https://apivet.dev/docs/standards#formats";
    /// Timestamp property standards.
    pub const TIMESTAMP_PROPERTIES: &str =
        "https://apivet.dev/docs/standards#timestamp-properties";
    /// Response header standards.
    pub const HEADERS: &str = "https://apivet.dev/docs/standards#headers";
    /// Component naming standards.
    pub const COMPONENT_NAMING: &str = "https://apivet.dev/docs/standards#component-naming";
    /// Versioned OpenAPI listing endpoints.
    pub const OPENAPI_VERSIONS: &str = "https://apivet.dev/docs/standards#openapi-versions";
    /// Status code standards.
    pub const STATUS_CODES: &str = "https://apivet.dev/docs/standards#status-codes";
}

/// Versioning and lifecycle documentation.
pub mod versioning {
    /// Breaking change policy.
    pub const BREAKING_CHANGES: &str = "https://apivet.dev/docs/versioning#breaking-changes";
    /// Stability levels.
    pub const STABILITY_LEVELS: &str = "https://apivet.dev/docs/versioning#stability-levels";
    /// Promoting stability.
    pub const PROMOTING_STABILITY: &str =
        "https://apivet.dev/docs/versioning#promoting-stability";
    /// The version query parameter.
    pub const VERSION_PARAMETER: &str = "https://apivet.dev/docs/versioning#version-parameter";
    /// Required response headers.
    pub const RESPONSE_HEADERS: &str = "https://apivet.dev/docs/versioning#response-headers";
}

/// JSON:API conventions documentation.
pub mod json_api {
    /// Resource object shapes.
    pub const RESOURCE_OBJECTS: &str = "https://apivet.dev/docs/jsonapi#resource-objects";
    /// Patch request shapes.
    pub const PATCH_REQUESTS: &str = "https://apivet.dev/docs/jsonapi#patch-requests";
    /// Post request shapes.
    pub const POST_REQUESTS: &str = "https://apivet.dev/docs/jsonapi#post-requests";
    /// Patch response shapes.
    pub const PATCH_RESPONSES: &str = "https://apivet.dev/docs/jsonapi#patch-responses";
    /// The JSON:API content type.
    pub const CONTENT_TYPE: &str = "https://apivet.dev/docs/jsonapi#content-type";
    /// Pagination conventions.
    pub const PAGINATION: &str = "https://apivet.dev/docs/jsonapi#pagination";
}
