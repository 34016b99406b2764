//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays element by
//! element against a single item schema.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{SchemaValidationResult, TypeMismatch, ValidationResult};
use crate::path::JsonPath;
use crate::validation::{gate, run_validators, Gate, SchemaBase, ValidatorOutcome};

use super::traits::{SchemaBuilder, SchemaLike};

/// A schema for validating arrays.
///
/// Each element is validated against the item schema at path
/// `[..., index]`, one element at a time. The parsed array keeps the input
/// length and order. Array-level validators (item counts, custom checks) run
/// afterwards against the parsed array. The implicit default is `[]`.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string().minimum_length(1)).minimum_items(1);
///
/// let result = futures::executor::block_on(schema.validate(&json!(["a", ""])));
/// assert!(!result.is_valid());
/// assert_eq!(result.errors()[0].path.to_segments(), vec!["1"]);
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema<S> {
    base: SchemaBase,
    item_schema: S,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates a new array schema with the given item schema.
    pub fn new(item_schema: S) -> Self {
        Self {
            base: SchemaBase::default(),
            item_schema,
        }
    }

    /// The schema applied to every element.
    pub fn item_schema(&self) -> &S {
        &self.item_schema
    }

    /// Fails with `tooFewItems` when the array has fewer than `min` elements.
    pub fn minimum_items(self, min: usize) -> Self {
        self.add_validator("minimumItems", move |value: &Value, path: &JsonPath| {
            let len = value.as_array().map_or(0, Vec::len);
            if len < min {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooFewItems",
                    format!("Must contain at least {} items.", min),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `tooManyItems` when the array has more than `max` elements.
    pub fn maximum_items(self, max: usize) -> Self {
        self.add_validator("maximumItems", move |value: &Value, path: &JsonPath| {
            let len = value.as_array().map_or(0, Vec::len);
            if len > max {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooManyItems",
                    format!("Must contain at most {} items.", max),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }
}

fn parse(value: &Value) -> Result<&Vec<Value>, TypeMismatch> {
    value
        .as_array()
        .ok_or_else(|| TypeMismatch::new("array", value))
}

#[async_trait]
impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "array"
    }

    fn type_default(&self) -> Option<Value> {
        Some(Value::Array(Vec::new()))
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        let items = match gate(&self.base, value, path, parse) {
            Gate::Done(result) => return result,
            Gate::Parsed(items) => items,
        };

        let mut result = SchemaValidationResult::valid(None);
        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let child = self
                .item_schema
                .validate_at(Some(item), &path.push_index(index))
                .await;
            parsed.push(result.absorb(child).unwrap_or(Value::Null));
        }

        let parsed = Value::Array(parsed);
        run_validators(&self.base.validators, &parsed, path, &mut result).await;
        result.set_value(Some(parsed));

        debug!(path = %path, errors = result.errors().len(), "validated array");
        result
    }
}

impl<S: SchemaLike> SchemaBuilder for ArraySchema<S> {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}
