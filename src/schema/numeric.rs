//! Numeric schema validation.
//!
//! This module provides [`NumberSchema`] for validating finite numbers with
//! bounds, integrality and sign requirements.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SchemaValidationResult, TypeMismatch, ValidationResult};
use crate::path::JsonPath;
use crate::validation::{validate_scalar, SchemaBase, ValidatorOutcome};

use super::traits::{SchemaBuilder, SchemaLike};

/// A schema for validating numbers.
///
/// Any finite JSON number passes the type check; integer and float
/// representations are both accepted and preserved in the parsed value.
/// There is no implicit default: `0` is data, not absence.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use serde_json::json;
///
/// let schema = Schema::number().minimum(0).maximum(100).integer();
///
/// let result = futures::executor::block_on(schema.validate(&json!(101.5)));
/// let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
/// assert_eq!(identifiers, vec!["tooLarge", "notInteger"]);
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    base: SchemaBase,
}

impl NumberSchema {
    /// Creates a new number schema with no validators.
    pub fn new() -> Self {
        Self {
            base: SchemaBase::default(),
        }
    }

    /// Fails with `tooSmall` below `min` (inclusive bound).
    pub fn minimum(self, min: impl Into<f64>) -> Self {
        let min = min.into();
        self.check_number("minimum", move |n, path| {
            if n < min {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooSmall",
                    format!("Must be at least {}.", min),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `tooLarge` above `max` (inclusive bound).
    pub fn maximum(self, max: impl Into<f64>) -> Self {
        let max = max.into();
        self.check_number("maximum", move |n, path| {
            if n > max {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooLarge",
                    format!("Must be at most {}.", max),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `notInteger` when the number has a fractional part.
    pub fn integer(self) -> Self {
        self.check_number("integer", |n, path| {
            if n.fract() != 0.0 {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "notInteger",
                    "Must be a whole number.",
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `notPositive` unless the number is greater than zero.
    pub fn positive(self) -> Self {
        self.check_number("positive", |n, path| {
            if n > 0.0 {
                ValidatorOutcome::pass()
            } else {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "notPositive",
                    "Must be greater than 0.",
                ))
            }
        })
    }

    /// Fails with `notNegative` unless the number is less than zero.
    pub fn negative(self) -> Self {
        self.check_number("negative", |n, path| {
            if n < 0.0 {
                ValidatorOutcome::pass()
            } else {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "notNegative",
                    "Must be less than 0.",
                ))
            }
        })
    }

    fn check_number<F>(self, identifier: &str, check: F) -> Self
    where
        F: Fn(f64, &JsonPath) -> ValidatorOutcome + Send + Sync + 'static,
    {
        self.add_validator(identifier, move |value: &Value, path: &JsonPath| {
            match value.as_f64() {
                Some(n) => check(n, path),
                None => ValidatorOutcome::pass(),
            }
        })
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(value: &Value) -> Result<Value, TypeMismatch> {
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(value.clone()),
        _ => Err(TypeMismatch::new("number", value)),
    }
}

#[async_trait]
impl SchemaLike for NumberSchema {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "number"
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        validate_scalar(&self.base, value, path, parse).await
    }
}

impl SchemaBuilder for NumberSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_accepts_integers_and_floats() {
        let schema = NumberSchema::new();
        assert_eq!(schema.validate(&json!(5)).await.value(), Some(&json!(5)));
        assert_eq!(schema.validate(&json!(2.5)).await.value(), Some(&json!(2.5)));
    }

    #[tokio::test]
    async fn test_rejects_numeric_strings() {
        let result = NumberSchema::new().validate(&json!("5")).await;
        assert_eq!(result.errors()[0].identifier, "invalidType");
        assert_eq!(result.errors()[0].message, "Expected number, received string");
    }

    #[tokio::test]
    async fn test_zero_is_not_absent() {
        let result = NumberSchema::new().validate(&json!(0)).await;
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_bounds_messages() {
        let schema = NumberSchema::new().minimum(1.5).maximum(3);
        let result = schema.validate(&json!(1)).await;
        assert_eq!(result.errors()[0].identifier, "tooSmall");
        assert_eq!(result.errors()[0].message, "Must be at least 1.5.");

        let result = schema.validate(&json!(4)).await;
        assert_eq!(result.errors()[0].identifier, "tooLarge");
        assert_eq!(result.errors()[0].message, "Must be at most 3.");
    }

    #[tokio::test]
    async fn test_sign_checks_on_zero() {
        let result = NumberSchema::new().positive().negative().validate(&json!(0)).await;
        let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["notPositive", "notNegative"]);
    }

    #[tokio::test]
    async fn test_integer() {
        let schema = NumberSchema::new().integer();
        assert!(schema.validate(&json!(4.0)).await.is_valid());
        assert_eq!(
            schema.validate(&json!(4.2)).await.errors()[0].identifier,
            "notInteger"
        );
    }

    #[test]
    fn test_no_implicit_default() {
        assert_eq!(NumberSchema::new().get_default(), None);
        assert_eq!(NumberSchema::new().default(0).get_default(), Some(json!(0)));
    }
}
