//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length bounds, email format and non-emptiness checks.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::error::{SchemaValidationResult, TypeMismatch, ValidationResult};
use crate::path::JsonPath;
use crate::validation::{validate_scalar, SchemaBase, ValidatorOutcome};

use super::traits::{SchemaBuilder, SchemaLike};

/// Length as UTF-16 code units, the unit browsers report for input values.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// A schema for validating string values.
///
/// The implicit default is the empty string. Length checks count UTF-16
/// code units, so characters outside the Basic Multilingual Plane (most
/// emoji) count as two.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use serde_json::json;
///
/// let schema = Schema::string().minimum_length(3).maximum_length(5);
///
/// let result = futures::executor::block_on(schema.validate(&json!("hi")));
/// assert!(!result.is_valid());
/// assert_eq!(result.errors()[0].identifier, "tooShort");
/// ```
#[derive(Debug, Clone)]
pub struct StringSchema {
    base: SchemaBase,
}

impl StringSchema {
    /// Creates a new string schema with no validators.
    pub fn new() -> Self {
        Self {
            base: SchemaBase::default(),
        }
    }

    /// Fails with `tooShort` when the string is shorter than `min` UTF-16
    /// code units.
    pub fn minimum_length(self, min: usize) -> Self {
        self.check_str("minimumLength", move |s, path| {
            if utf16_len(s) < min {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooShort",
                    format!("Must be at least {} characters.", min),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `tooLong` when the string is longer than `max` UTF-16
    /// code units.
    pub fn maximum_length(self, max: usize) -> Self {
        self.check_str("maximumLength", move |s, path| {
            if utf16_len(s) > max {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "tooLong",
                    format!("Must be at most {} characters.", max),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Checks the email address format.
    ///
    /// The empty string passes; whether it is acceptable is decided by the
    /// required check. A well-formed address records a `validEmailAddress`
    /// success, a malformed one an `invalidEmailAddress` error.
    pub fn email_address(self) -> Self {
        self.check_str("emailAddress", |s, path| {
            if s.is_empty() {
                ValidatorOutcome::pass()
            } else if email_regex().is_match(s) {
                ValidatorOutcome::succeed(ValidationResult::new(
                    path.clone(),
                    "validEmailAddress",
                    "Valid email address.",
                ))
            } else {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "invalidEmailAddress",
                    "Invalid email address.",
                ))
            }
        })
    }

    /// Fails with `empty` on the empty string.
    ///
    /// Useful on optional fields, where `""` is not caught by the required
    /// check.
    pub fn not_empty(self) -> Self {
        self.check_str("notEmpty", |s, path| {
            if s.is_empty() {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "empty",
                    "Must not be empty.",
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    fn check_str<F>(self, identifier: &str, check: F) -> Self
    where
        F: Fn(&str, &JsonPath) -> ValidatorOutcome + Send + Sync + 'static,
    {
        self.add_validator(identifier, move |value: &Value, path: &JsonPath| {
            check(value.as_str().unwrap_or_default(), path)
        })
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(value: &Value) -> Result<Value, TypeMismatch> {
    match value {
        Value::String(_) => Ok(value.clone()),
        other => Err(TypeMismatch::new("string", other)),
    }
}

#[async_trait]
impl SchemaLike for StringSchema {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn type_default(&self) -> Option<Value> {
        Some(Value::String(String::new()))
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        validate_scalar(&self.base, value, path, parse).await
    }
}

impl SchemaBuilder for StringSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}
