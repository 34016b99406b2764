//! Resolver contract for form libraries.
//!
//! Form libraries in the react-hook-form family expect a resolver to return
//! `{values, errors}`: the committed values when the form is valid, or an
//! empty object plus one error per field when it is not. [`resolve`] runs a
//! schema and translates its report into that shape.
//!
//! Only the first error per field is kept; the complete list remains
//! available from [`SchemaValidationResult::errors`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaValidationResult;
use crate::schema::SchemaLike;

/// Key used for errors reported at the schema root.
pub const ROOT_KEY: &str = "root";

/// One field's error in resolver form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The error identifier.
    #[serde(rename = "type")]
    pub error_type: String,
    /// The error message.
    pub message: String,
}

/// The `{values, errors}` resolver payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverResult {
    /// Parsed values when valid, `{}` otherwise.
    pub values: Value,
    /// First error per dot-joined field path, in report order.
    pub errors: IndexMap<String, FieldError>,
}

impl ResolverResult {
    /// True when no field has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<SchemaValidationResult> for ResolverResult {
    fn from(result: SchemaValidationResult) -> Self {
        if result.is_valid() {
            return Self {
                values: result
                    .into_value()
                    .unwrap_or_else(|| Value::Object(Map::new())),
                errors: IndexMap::new(),
            };
        }

        let mut errors = IndexMap::new();
        for error in result.errors() {
            let key = if error.path.is_root() {
                ROOT_KEY.to_string()
            } else {
                error.path.to_dotted()
            };
            errors.entry(key).or_insert_with(|| FieldError {
                error_type: error.identifier.clone(),
                message: error.message.clone(),
            });
        }

        Self {
            values: Value::Object(Map::new()),
            errors,
        }
    }
}

/// Validates `values` against `schema` and returns the resolver payload.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use preflight::interop::form_resolver::resolve;
/// use serde_json::json;
///
/// let schema = Schema::object().field(
///     "user",
///     Schema::object().field("email", Schema::string().email_address().minimum_length(20)),
/// );
///
/// let resolved = futures::executor::block_on(resolve(&schema, &json!({"user": {"email": "bad"}})));
/// assert_eq!(resolved.values, json!({}));
/// assert_eq!(resolved.errors.len(), 1);
/// assert_eq!(resolved.errors["user.email"].error_type, "invalidEmailAddress");
/// ```
pub async fn resolve<S>(schema: &S, values: &Value) -> ResolverResult
where
    S: SchemaLike + ?Sized,
{
    schema.validate(values).await.into()
}
