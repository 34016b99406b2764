//! Boolean schema validation.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SchemaValidationResult, TypeMismatch};
use crate::path::JsonPath;
use crate::validation::{validate_scalar, SchemaBase};

use super::traits::{SchemaBuilder, SchemaLike};

/// A schema accepting only `true` and `false`.
///
/// There is no implicit default: `false` is data, not absence.
#[derive(Debug, Clone)]
pub struct BooleanSchema {
    base: SchemaBase,
}

impl BooleanSchema {
    /// Creates a new boolean schema with no validators.
    pub fn new() -> Self {
        Self {
            base: SchemaBase::default(),
        }
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(value: &Value) -> Result<Value, TypeMismatch> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        other => Err(TypeMismatch::new("boolean", other)),
    }
}

#[async_trait]
impl SchemaLike for BooleanSchema {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "boolean"
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        validate_scalar(&self.base, value, path, parse).await
    }
}

impl SchemaBuilder for BooleanSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_false_is_valid_data() {
        let result = BooleanSchema::new().validate(&json!(false)).await;
        assert!(result.is_valid());
        assert_eq!(result.value(), Some(&json!(false)));
    }

    #[tokio::test]
    async fn test_rejects_truthy_values() {
        for value in [json!(1), json!("true")] {
            let result = BooleanSchema::new().validate(&value).await;
            assert_eq!(result.errors()[0].identifier, "invalidType");
        }
    }

    #[test]
    fn test_no_implicit_default() {
        assert_eq!(BooleanSchema::new().get_default(), None);
    }
}
