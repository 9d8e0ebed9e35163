//! Location shapes for each fact kind.
//!
//! A [`Location`] is a closed tagged union with one variant per fact kind,
//! carrying exactly the coordinates that kind has: an operation, a status
//! code, a parameter name, a body property trail. The fact kind is derived
//! from the variant ([`Location::kind`]) rather than stored alongside it, so
//! a fact can never claim to be one kind while carrying another kind's
//! coordinates.
//!
//! `Display` renders the human-readable `where` string used in results, e.g.
//!
//! ```text
//! GET /example response 200 response body: application/json property data/attributes/tested_at
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of API description element a fact describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FactKind {
    /// An operation (method + path).
    Operation,
    /// A request body, keyed by content type.
    Request,
    /// A response, keyed by status code.
    Response,
    /// A header of a response.
    ResponseHeader,
    /// A query parameter of an operation.
    QueryParameter,
    /// A path parameter of an operation.
    PathParameter,
    /// A header parameter of an operation.
    HeaderParameter,
    /// A body schema property, keyed by its property trail.
    Property,
    /// The description document itself.
    Specification,
}

impl FactKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operation => "operation",
            Self::Request => "request",
            Self::Response => "response",
            Self::ResponseHeader => "response header",
            Self::QueryParameter => "query parameter",
            Self::PathParameter => "path parameter",
            Self::HeaderParameter => "header parameter",
            Self::Property => "property",
            Self::Specification => "specification",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinates of an operation: lowercase method plus path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationLocation {
    /// Path pattern, e.g. `/orgs/{org_id}/things`.
    pub path: String,
    /// Lowercase HTTP method, e.g. `get`.
    pub method: String,
}

impl OperationLocation {
    /// Creates an operation location from a method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for OperationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.to_ascii_uppercase(), self.path)
    }
}

/// Anchors a body property to the request or one response of its operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyAnchor {
    /// Content type of the body the property lives in.
    pub content_type: String,
    /// Status code of the enclosing response; `None` anchors the property to
    /// the request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl BodyAnchor {
    /// Anchor to the request body with the given content type.
    pub fn request(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            response_status: None,
        }
    }

    /// Anchor to the body of the response with the given status code.
    pub fn response(status_code: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            response_status: Some(status_code.into()),
        }
    }
}

/// Where a fact sits in the API description.
///
/// One variant per [`FactKind`], each carrying that kind's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Location {
    /// An operation.
    Operation {
        /// The operation coordinates.
        op: OperationLocation,
    },
    /// A request body of an operation.
    Request {
        /// The enclosing operation.
        op: OperationLocation,
        /// Content type of the request body.
        content_type: String,
    },
    /// A response of an operation.
    Response {
        /// The enclosing operation.
        op: OperationLocation,
        /// Status code of the response.
        status_code: String,
    },
    /// A header of a response.
    ResponseHeader {
        /// The enclosing operation.
        op: OperationLocation,
        /// Status code of the enclosing response.
        status_code: String,
        /// Header name.
        name: String,
    },
    /// A query parameter of an operation.
    QueryParameter {
        /// The enclosing operation.
        op: OperationLocation,
        /// Parameter name.
        name: String,
    },
    /// A path parameter of an operation.
    PathParameter {
        /// The enclosing operation.
        op: OperationLocation,
        /// Parameter name.
        name: String,
    },
    /// A header parameter of an operation.
    HeaderParameter {
        /// The enclosing operation.
        op: OperationLocation,
        /// Parameter name.
        name: String,
    },
    /// A body schema property.
    Property {
        /// The enclosing operation.
        op: OperationLocation,
        /// Which body the property lives in.
        body: BodyAnchor,
        /// Property key trail from the schema root, e.g.
        /// `["data", "attributes", "tested_at"]`.
        trail: Vec<String>,
    },
    /// The description document itself.
    Specification,
}

impl Location {
    /// The fact kind this location belongs to.
    #[must_use]
    pub const fn kind(&self) -> FactKind {
        match self {
            Self::Operation { .. } => FactKind::Operation,
            Self::Request { .. } => FactKind::Request,
            Self::Response { .. } => FactKind::Response,
            Self::ResponseHeader { .. } => FactKind::ResponseHeader,
            Self::QueryParameter { .. } => FactKind::QueryParameter,
            Self::PathParameter { .. } => FactKind::PathParameter,
            Self::HeaderParameter { .. } => FactKind::HeaderParameter,
            Self::Property { .. } => FactKind::Property,
            Self::Specification => FactKind::Specification,
        }
    }

    /// The enclosing operation, if this location has one.
    #[must_use]
    pub const fn operation(&self) -> Option<&OperationLocation> {
        match self {
            Self::Operation { op }
            | Self::Request { op, .. }
            | Self::Response { op, .. }
            | Self::ResponseHeader { op, .. }
            | Self::QueryParameter { op, .. }
            | Self::PathParameter { op, .. }
            | Self::HeaderParameter { op, .. }
            | Self::Property { op, .. } => Some(op),
            Self::Specification => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation { op } => write!(f, "{op}"),
            Self::Request { op, content_type } => {
                write!(f, "{op} request body: {content_type}")
            },
            Self::Response { op, status_code } => write!(f, "{op} response {status_code}"),
            Self::ResponseHeader {
                op,
                status_code,
                name,
            } => write!(f, "{op} response {status_code} header: {name}"),
            Self::QueryParameter { op, name } => write!(f, "{op} query parameter: {name}"),
            Self::PathParameter { op, name } => write!(f, "{op} path parameter: {name}"),
            Self::HeaderParameter { op, name } => write!(f, "{op} header parameter: {name}"),
            Self::Property { op, body, trail } => {
                match &body.response_status {
                    Some(status) => write!(
                        f,
                        "{op} response {status} response body: {}",
                        body.content_type
                    )?,
                    None => write!(f, "{op} request body: {}", body.content_type)?,
                }
                write!(f, " property {}", trail.join("/"))
            },
            Self::Specification => f.write_str("this specification"),
        }
    }
}
