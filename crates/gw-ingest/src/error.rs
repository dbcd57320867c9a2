//! Error kinds surfaced by parsing.

use std::fmt;

use serde_json::Value;

/// A payload that is present but does not have the recognised shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The body is not JSON, or its top level is not the expected container.
    Malformed { reason: String },
    /// A required identity field is absent, null or empty.
    MissingField { field: String },
    /// A numeric field holds a non-numeric JSON value.
    NotNumeric { field: String, found: &'static str },
    /// A non-numeric field holds a JSON value of the wrong type.
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A numeric field holds a value outside the range of its target type.
    OutOfRange { field: String, value: String },
    InvalidUuid { field: String, raw: String },
    InvalidInstant { field: String, raw: String },
    /// Two roster entries share a name or a uuid.
    DuplicateMember { key: &'static str, value: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Malformed { reason } => write!(f, "malformed payload: {reason}"),
            SchemaError::MissingField { field } => {
                write!(f, "required field '{field}' is missing")
            }
            SchemaError::NotNumeric { field, found } => {
                write!(f, "field '{field}' must be numeric, found {found}")
            }
            SchemaError::WrongType {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' must be {expected}, found {found}"),
            SchemaError::OutOfRange { field, value } => {
                write!(f, "field '{field}' is out of range: {value}")
            }
            SchemaError::InvalidUuid { field, raw } => {
                write!(f, "field '{field}' is not a uuid: '{raw}'")
            }
            SchemaError::InvalidInstant { field, raw } => {
                write!(f, "field '{field}' is not an RFC 3339 instant: '{raw}'")
            }
            SchemaError::DuplicateMember { key, value } => {
                write!(f, "duplicate guild member {key} '{value}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Outcome of parsing a response that did not yield a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Upstream reports the player or guild does not exist. Not a failure of
    /// the payload itself.
    NotFound { what: &'static str },
    Schema(SchemaError),
}

impl IngestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IngestError::NotFound { .. })
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::NotFound { what } => write!(f, "{what} not found"),
            IngestError::Schema(e) => write!(f, "schema error: {e}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Schema(e) => Some(e),
            IngestError::NotFound { .. } => None,
        }
    }
}

impl From<SchemaError> for IngestError {
    fn from(e: SchemaError) -> Self {
        IngestError::Schema(e)
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
