//! Remote availability checks.
//!
//! Some values can only be judged by a backend: is this username taken, is
//! this slug forbidden. The engine does not talk to the backend itself; the
//! caller injects an [`AvailabilityCheck`] that answers with one of four
//! [`Availability`] outcomes, and [`StringSchema::remote_check`] turns the
//! answer into a success or an error.
//!
//! A failing checker never fails validation with a Rust error: it is logged
//! and reported as a `graphqlError` entry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{RemoteCheckError, ValidationResult};
use crate::path::JsonPath;
use crate::schema::{SchemaBuilder, StringSchema};
use crate::validation::{Validator, ValidatorOutcome};

/// The backend's verdict on a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// The value can be used.
    Available,
    /// Another record already uses the value.
    Taken,
    /// The backend rejects the value's format.
    Invalid,
    /// The value is reserved or not allowed for this user.
    Forbidden,
}

impl Availability {
    /// Reads the outcome stored under `field` in a response payload.
    ///
    /// ```rust
    /// use preflight::Availability;
    /// use serde_json::json;
    ///
    /// let payload = json!({"usernameAvailability": "Taken", "__typename": "Query"});
    /// let outcome = Availability::from_response(&payload, "usernameAvailability").unwrap();
    /// assert_eq!(outcome, Availability::Taken);
    /// ```
    pub fn from_response(payload: &Value, field: &str) -> Result<Self, RemoteCheckError> {
        let raw = payload
            .get(field)
            .ok_or_else(|| RemoteCheckError::MissingField {
                field: field.to_string(),
            })?;
        Ok(Availability::deserialize(raw)?)
    }
}

/// The injected remote query.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Asks the backend about `value`.
    async fn check(&self, value: &Value) -> Result<Availability, RemoteCheckError>;
}

/// Adapts a closure returning a future into an [`AvailabilityCheck`].
pub struct CheckFn<F>(F);

impl<F, Fut> CheckFn<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Availability, RemoteCheckError>> + Send + 'static,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> AvailabilityCheck for CheckFn<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Availability, RemoteCheckError>> + Send + 'static,
{
    async fn check(&self, value: &Value) -> Result<Availability, RemoteCheckError> {
        (self.0)(value.clone()).await
    }
}

/// Validator mapping an [`AvailabilityCheck`] answer to a result entry.
pub struct RemoteCheckValidator {
    checker: Arc<dyn AvailabilityCheck>,
}

impl RemoteCheckValidator {
    /// Wraps `checker`.
    pub fn new(checker: Arc<dyn AvailabilityCheck>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl Validator for RemoteCheckValidator {
    async fn check(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome {
        let failure = |identifier: &str, message: &str| {
            ValidatorOutcome::fail(ValidationResult::new(path.clone(), identifier, message))
        };

        match self.checker.check(value).await {
            Ok(Availability::Available) => ValidatorOutcome::succeed(ValidationResult::new(
                path.clone(),
                "available",
                "Available.",
            )),
            Ok(Availability::Taken) => failure("taken", "Already taken."),
            Ok(Availability::Invalid) => failure("invalid", "Invalid."),
            Ok(Availability::Forbidden) => failure("forbidden", "Not allowed."),
            Err(error) => {
                warn!(path = %path, error = %error, "remote availability check failed");
                failure("graphqlError", "Could not be verified. Please try again.")
            }
        }
    }
}

impl StringSchema {
    /// Registers a remote availability check.
    ///
    /// Runs after the validators registered before it, like any other
    /// validator.
    ///
    /// ```rust
    /// use preflight::prelude::*;
    /// use preflight::{Availability, CheckFn, RemoteCheckError};
    /// use serde_json::{json, Value};
    ///
    /// let schema = Schema::string()
    ///     .minimum_length(3)
    ///     .remote_check(CheckFn::new(|value: Value| async move {
    ///         let outcome = if value == json!("admin") {
    ///             Availability::Forbidden
    ///         } else {
    ///             Availability::Available
    ///         };
    ///         Ok::<_, RemoteCheckError>(outcome)
    ///     }));
    ///
    /// let result = futures::executor::block_on(schema.validate(&json!("admin")));
    /// assert_eq!(result.errors()[0].identifier, "forbidden");
    /// ```
    pub fn remote_check<C>(self, checker: C) -> Self
    where
        C: AvailabilityCheck + 'static,
    {
        self.with_validator(
            "remoteCheck",
            Arc::new(RemoteCheckValidator::new(Arc::new(checker))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaLike;
    use serde_json::json;

    fn fixed(outcome: Result<Availability, String>) -> impl AvailabilityCheck {
        CheckFn::new(move |_value: Value| {
            let outcome = outcome.clone().map_err(RemoteCheckError::Transport);
            async move { outcome }
        })
    }

    #[tokio::test]
    async fn test_outcome_mapping() {
        let cases = [
            (Availability::Taken, "taken"),
            (Availability::Invalid, "invalid"),
            (Availability::Forbidden, "forbidden"),
        ];
        for (outcome, identifier) in cases {
            let schema = StringSchema::new().remote_check(fixed(Ok(outcome)));
            let result = schema.validate(&json!("ada")).await;
            assert_eq!(result.errors().len(), 1);
            assert_eq!(result.errors()[0].identifier, identifier);
        }
    }

    #[tokio::test]
    async fn test_available_is_a_success() {
        let schema = StringSchema::new().remote_check(fixed(Ok(Availability::Available)));
        let result = schema.validate(&json!("ada")).await;
        assert!(result.is_valid());
        assert_eq!(result.successes()[0].identifier, "available");
    }

    #[tokio::test]
    async fn test_checker_failure_becomes_graphql_error() {
        let schema = StringSchema::new().remote_check(fixed(Err("timeout".to_string())));
        let result = schema.validate(&json!("ada")).await;
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].identifier, "graphqlError");
    }

    #[test]
    fn test_from_response_reads_named_field() {
        let payload = json!({"__typename": "Query", "emailAvailability": "Available"});
        assert_eq!(
            Availability::from_response(&payload, "emailAvailability").unwrap(),
            Availability::Available
        );
    }

    #[test]
    fn test_from_response_errors() {
        let payload = json!({"emailAvailability": "Maybe"});
        assert!(matches!(
            Availability::from_response(&payload, "other"),
            Err(RemoteCheckError::MissingField { .. })
        ));
        assert!(matches!(
            Availability::from_response(&payload, "emailAvailability"),
            Err(RemoteCheckError::Malformed(_))
        ));
    }
}
