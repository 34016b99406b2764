//! Traits shared by every schema kind.
//!
//! [`SchemaLike`] is the read side: type name, defaults and the async
//! `validate`. [`SchemaBuilder`] is the configuration side: modifiers and
//! validator registration, each consuming the schema and returning the
//! reconfigured one.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{SchemaValidationResult, ValidationRule};
use crate::path::JsonPath;
use crate::validation::{
    AsyncFnValidator, FnValidator, RegisteredValidator, SchemaBase, Validator, ValidatorOutcome,
};

/// A schema that validates JSON values.
///
/// Schemas are never mutated by validation, so one instance can be shared
/// (e.g. behind an `Arc`) by any number of concurrent `validate` calls.
#[async_trait]
pub trait SchemaLike: Send + Sync {
    /// Modifier flags, default and validators of this schema.
    fn base(&self) -> &SchemaBase;

    /// The name used in `invalidType` messages.
    fn type_name(&self) -> &'static str;

    /// The implicit default of this kind, if it has one.
    fn type_default(&self) -> Option<Value> {
        None
    }

    /// Whether absent and `null` values are accepted without checks.
    fn is_optional(&self) -> bool {
        self.base().optional
    }

    /// Whether `null` is accepted without checks.
    fn is_nullable(&self) -> bool {
        self.base().nullable
    }

    /// The explicit default if set, otherwise the kind's implicit default.
    fn get_default(&self) -> Option<Value> {
        self.base()
            .default
            .clone()
            .or_else(|| self.type_default())
    }

    /// Validates `value` located at `path`. `None` is an absent value.
    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult;

    /// Validates `value` at the root path.
    async fn validate(&self, value: &Value) -> SchemaValidationResult {
        let result = self.validate_at(Some(value), &JsonPath::root()).await;
        debug!(
            schema = self.type_name(),
            valid = result.is_valid(),
            errors = result.errors().len(),
            "validation finished"
        );
        result
    }
}

/// Chainable configuration shared by every schema kind.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .minimum_length(3)
///     .message("Usernames need at least three characters.")
///     .optional();
///
/// let result = futures::executor::block_on(schema.validate(&json!("al")));
/// assert_eq!(result.errors()[0].message, "Usernames need at least three characters.");
///
/// let result = futures::executor::block_on(schema.validate(&json!(null)));
/// assert!(result.is_valid());
/// ```
pub trait SchemaBuilder: SchemaLike + Sized {
    /// Mutable access to the shared configuration.
    fn base_mut(&mut self) -> &mut SchemaBase;

    /// Accepts absent and `null` values without running any check.
    fn optional(mut self) -> Self {
        self.base_mut().optional = true;
        self
    }

    /// Accepts `null` without running any check. Absent values are still
    /// required unless the schema is also optional.
    fn nullable(mut self) -> Self {
        self.base_mut().nullable = true;
        self
    }

    /// Sets the explicit default returned by `get_default`.
    fn default(mut self, value: impl Into<Value>) -> Self {
        self.base_mut().default = Some(value.into());
        self
    }

    /// Registers a synchronous validator.
    fn add_validator<F>(self, identifier: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &JsonPath) -> ValidatorOutcome + Send + Sync + 'static,
    {
        self.with_validator(identifier, Arc::new(FnValidator::new(f)))
    }

    /// Registers a validator built from a closure returning a future.
    fn add_async_validator<F, Fut>(self, identifier: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, JsonPath) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidatorOutcome> + Send + 'static,
    {
        self.with_validator(identifier, Arc::new(AsyncFnValidator::new(f)))
    }

    /// Registers any [`Validator`] implementation.
    fn with_validator(mut self, identifier: impl Into<String>, validator: Arc<dyn Validator>) -> Self {
        self.base_mut()
            .push(RegisteredValidator::new(identifier.into(), validator));
        self
    }

    /// Replaces the error message of the most recently registered validator.
    ///
    /// Does nothing when no validator is registered yet.
    fn message(mut self, message: impl Into<String>) -> Self {
        self.base_mut().set_last_message(message.into());
        self
    }

    /// Attaches a rule reference to the results of the most recently
    /// registered validator.
    fn rule(mut self, rule: ValidationRule) -> Self {
        self.base_mut().set_last_rule(rule);
        self
    }
}
