//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects against
//! a shape of named field schemas.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{SchemaValidationResult, TypeMismatch};
use crate::path::JsonPath;
use crate::validation::{gate, run_validators, Gate, SchemaBase};

use super::traits::{SchemaBuilder, SchemaLike};

/// A schema for validating JSON objects.
///
/// Fields are validated in declaration order, each at path
/// `[..., field_name]`; a missing property is validated as an absent value.
/// Properties not declared in the shape are ignored: they are neither
/// reported nor copied into the parsed value.
///
/// Object-level validators registered with
/// [`add_validator`](SchemaBuilder::add_validator) run after the fields
/// against the assembled object, whether or not the fields validated. The
/// object they see may lack absent fields or hold values that failed.
/// Keys of the assembled object follow declaration order.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().minimum_length(2))
///     .field("age", Schema::number().minimum(0));
///
/// let result = futures::executor::block_on(schema.validate(&json!({
///     "name": "Al",
///     "age": 5,
///     "nickname": "ignored"
/// })));
/// assert!(result.is_valid());
/// assert_eq!(result.value(), Some(&json!({"name": "Al", "age": 5})));
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    base: SchemaBase,
    shape: IndexMap<String, Arc<dyn SchemaLike>>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self {
            base: SchemaBase::default(),
            shape: IndexMap::new(),
        }
    }

    /// Adds a field to the shape.
    ///
    /// Declaring a name twice replaces the earlier schema but keeps the
    /// original position.
    pub fn field<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.shared_field(name, Arc::new(schema))
    }

    /// Adds a field whose schema is already shared.
    pub fn shared_field(mut self, name: impl Into<String>, schema: Arc<dyn SchemaLike>) -> Self {
        self.shape.insert(name.into(), schema);
        self
    }

    /// Looks up a field schema by name.
    pub fn get(&self, name: &str) -> Option<&dyn SchemaLike> {
        self.shape.get(name).map(|schema| schema.as_ref())
    }

    /// Iterates the shape in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &dyn SchemaLike)> {
        self.shape
            .iter()
            .map(|(name, schema)| (name.as_str(), schema.as_ref()))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// True when no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Collects the defaults of the fields that have one.
    ///
    /// Used to seed initial form state. Fields whose `get_default` is `None`
    /// are left out.
    pub fn get_defaults(&self) -> Map<String, Value> {
        self.shape
            .iter()
            .filter_map(|(name, schema)| schema.get_default().map(|value| (name.clone(), value)))
            .collect()
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("base", &self.base)
            .field("fields", &self.shape.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn parse(value: &Value) -> Result<&Map<String, Value>, TypeMismatch> {
    value
        .as_object()
        .ok_or_else(|| TypeMismatch::new("object", value))
}

#[async_trait]
impl SchemaLike for ObjectSchema {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "object"
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        let object = match gate(&self.base, value, path, parse) {
            Gate::Done(result) => return result,
            Gate::Parsed(object) => object,
        };

        let mut result = SchemaValidationResult::valid(None);
        let mut parsed = Map::new();
        for (name, schema) in &self.shape {
            let field_path = path.push_field(name.as_str());
            trace!(path = %field_path, "validating field");

            let child = schema.validate_at(object.get(name), &field_path).await;
            if let Some(value) = result.absorb(child) {
                parsed.insert(name.clone(), value);
            }
        }

        let parsed = Value::Object(parsed);
        run_validators(&self.base.validators, &parsed, path, &mut result).await;
        result.set_value(Some(parsed));

        debug!(path = %path, errors = result.errors().len(), "validated object");
        result
    }
}

impl SchemaBuilder for ObjectSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}
