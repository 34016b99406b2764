//! Boundary failure types.

use serde_json::Value;
use thiserror::Error;

/// A value did not have the runtime type a schema expects.
///
/// The display form is the `invalidType` message shown to users.
///
/// ```rust
/// use preflight::TypeMismatch;
/// use serde_json::json;
///
/// let err = TypeMismatch::new("number", &json!("12"));
/// assert_eq!(err.to_string(), "Expected number, received string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected}, received {received}")]
pub struct TypeMismatch {
    /// The schema's type name.
    pub expected: String,
    /// The runtime type of the rejected value.
    pub received: &'static str,
}

impl TypeMismatch {
    /// Creates a mismatch between `expected` and the runtime type of `value`.
    pub fn new(expected: impl Into<String>, value: &Value) -> Self {
        Self {
            expected: expected.into(),
            received: value_type_name(value),
        }
    }
}

/// Failure of an injected remote availability checker.
///
/// Never escapes validation: the remote-check validator converts it into a
/// `graphqlError` entry.
#[derive(Debug, Error)]
pub enum RemoteCheckError {
    /// The request could not be completed.
    #[error("remote check failed: {0}")]
    Transport(String),
    /// The response did not contain the configured result field.
    #[error("remote check response has no `{field}` field")]
    MissingField { field: String },
    /// The result field did not hold a known availability outcome.
    #[error("remote check response is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Returns the JSON type name for a value.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
