//! Validator plumbing and the shared validate orchestration.
//!
//! Every schema kind owns a [`SchemaBase`] (modifier flags, explicit default,
//! registered validators) and validates through the same two steps:
//!
//! 1. [`gate`]: optional/nullable short-circuits, the required check and the
//!    type check via the kind's `parse`;
//! 2. [`run_validators`]: every registered validator, in registration order,
//!    each fully awaited before the next. Failures accumulate; nothing stops
//!    after the first failing validator.
//!
//! Composite kinds put their structural step (per-field or per-element
//! recursion) between the two.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::error::{SchemaValidationResult, TypeMismatch, ValidationResult, ValidationRule};
use crate::path::JsonPath;

/// Partial result contributed by one validator.
///
/// A validator is valid exactly when it reports no errors. It may report
/// successes either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorOutcome {
    errors: Vec<ValidationResult>,
    successes: Vec<ValidationResult>,
}

impl ValidatorOutcome {
    /// A passing outcome with nothing to report.
    pub fn pass() -> Self {
        Self::default()
    }

    /// A failing outcome with one error.
    pub fn fail(error: ValidationResult) -> Self {
        Self::pass().with_error(error)
    }

    /// A passing outcome with one success.
    pub fn succeed(success: ValidationResult) -> Self {
        Self::pass().with_success(success)
    }

    /// Adds an error and returns self for chaining.
    pub fn with_error(mut self, error: ValidationResult) -> Self {
        self.errors.push(error);
        self
    }

    /// Adds a success and returns self for chaining.
    pub fn with_success(mut self, success: ValidationResult) -> Self {
        self.successes.push(success);
        self
    }

    /// True when no errors were reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The reported errors.
    pub fn errors(&self) -> &[ValidationResult] {
        &self.errors
    }

    /// The reported successes.
    pub fn successes(&self) -> &[ValidationResult] {
        &self.successes
    }
}

/// A check run against an already type-checked value.
///
/// Validators may perform I/O; they are awaited one at a time.
///
/// ```rust
/// use async_trait::async_trait;
/// use preflight::{JsonPath, ValidationResult, Validator, ValidatorOutcome};
/// use serde_json::Value;
///
/// struct NoAdmin;
///
/// #[async_trait]
/// impl Validator for NoAdmin {
///     async fn check(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome {
///         if value.as_str() == Some("admin") {
///             ValidatorOutcome::fail(ValidationResult::new(
///                 path.clone(),
///                 "reserved",
///                 "This name is reserved.",
///             ))
///         } else {
///             ValidatorOutcome::pass()
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Validator: Send + Sync {
    /// Checks `value`, located at `path`.
    async fn check(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome;
}

/// Adapts a synchronous closure into a [`Validator`].
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&Value, &JsonPath) -> ValidatorOutcome + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value, &JsonPath) -> ValidatorOutcome + Send + Sync,
{
    async fn check(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome {
        (self.0)(value, path)
    }
}

/// Adapts a closure returning a future into a [`Validator`].
///
/// The closure receives owned copies of the value and path so the future
/// it returns can be `'static`.
pub struct AsyncFnValidator<F>(F);

impl<F, Fut> AsyncFnValidator<F>
where
    F: Fn(Value, JsonPath) -> Fut + Send + Sync,
    Fut: Future<Output = ValidatorOutcome> + Send + 'static,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Validator for AsyncFnValidator<F>
where
    F: Fn(Value, JsonPath) -> Fut + Send + Sync,
    Fut: Future<Output = ValidatorOutcome> + Send + 'static,
{
    async fn check(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome {
        (self.0)(value.clone(), path.clone()).await
    }
}

/// A validator registered on a schema, with its per-registration overrides.
#[derive(Clone)]
pub(crate) struct RegisteredValidator {
    identifier: String,
    validator: Arc<dyn Validator>,
    message: Option<String>,
    rule: Option<ValidationRule>,
}

impl RegisteredValidator {
    pub(crate) fn new(identifier: String, validator: Arc<dyn Validator>) -> Self {
        Self {
            identifier,
            validator,
            message: None,
            rule: None,
        }
    }

    async fn run(&self, value: &Value, path: &JsonPath) -> ValidatorOutcome {
        trace!(validator = %self.identifier, path = %path, "running validator");
        let mut outcome = self.validator.check(value, path).await;

        if let Some(message) = &self.message {
            for error in &mut outcome.errors {
                error.message.clone_from(message);
            }
        }
        if let Some(rule) = &self.rule {
            for entry in outcome.errors.iter_mut().chain(outcome.successes.iter_mut()) {
                if entry.validation_rule.is_none() {
                    entry.validation_rule = Some(rule.clone());
                }
            }
        }
        outcome
    }
}

impl fmt::Debug for RegisteredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredValidator")
            .field("identifier", &self.identifier)
            .field("message", &self.message)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// Modifier flags, explicit default and validators shared by every schema kind.
///
/// A field is required and non-nullable unless configured otherwise.
#[derive(Debug, Clone, Default)]
pub struct SchemaBase {
    pub(crate) optional: bool,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
    pub(crate) validators: Vec<RegisteredValidator>,
}

impl SchemaBase {
    /// Whether absent and `null` values are accepted without checks.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether `null` is accepted without checks.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The explicit default set with `.default(...)`.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Identifiers of the registered validators, in registration order.
    pub fn validator_identifiers(&self) -> Vec<&str> {
        self.validators
            .iter()
            .map(|v| v.identifier.as_str())
            .collect()
    }

    pub(crate) fn push(&mut self, validator: RegisteredValidator) {
        self.validators.push(validator);
    }

    pub(crate) fn set_last_message(&mut self, message: String) {
        if let Some(last) = self.validators.last_mut() {
            last.message = Some(message);
        }
    }

    pub(crate) fn set_last_rule(&mut self, rule: ValidationRule) {
        if let Some(last) = self.validators.last_mut() {
            last.rule = Some(rule);
        }
    }
}

/// Result of the presence and type checks.
pub(crate) enum Gate<T> {
    /// Validation is finished; return this result as is.
    Done(SchemaValidationResult),
    /// The value passed the type check; continue with the parsed form.
    Parsed(T),
}

/// Builds the `required` error for `path`.
pub(crate) fn required_error(path: &JsonPath) -> ValidationResult {
    ValidationResult::new(path.clone(), "required", "Required.")
}

/// Runs the presence short-circuits and the type check.
///
/// In order: optional and absent/null is valid; nullable and null is valid;
/// absent, null or `""` on a required schema fails with `required`; then
/// `parse` either yields the parsed form or fails with `invalidType`.
pub(crate) fn gate<'a, T, P>(
    base: &SchemaBase,
    value: Option<&'a Value>,
    path: &JsonPath,
    parse: P,
) -> Gate<T>
where
    P: FnOnce(&'a Value) -> Result<T, TypeMismatch>,
{
    let is_null = matches!(value, Some(Value::Null));

    if base.optional && (value.is_none() || is_null) {
        return Gate::Done(SchemaValidationResult::valid(value.cloned()));
    }
    if base.nullable && is_null {
        return Gate::Done(SchemaValidationResult::valid(Some(Value::Null)));
    }

    let present = match value {
        None | Some(Value::Null) => {
            return Gate::Done(SchemaValidationResult::invalid(
                value.cloned(),
                required_error(path),
            ))
        }
        // An optional schema lets "" through to `parse` and its validators.
        Some(Value::String(s)) if s.is_empty() && !base.optional => {
            return Gate::Done(SchemaValidationResult::invalid(
                value.cloned(),
                required_error(path),
            ))
        }
        Some(present) => present,
    };

    match parse(present) {
        Ok(parsed) => Gate::Parsed(parsed),
        Err(mismatch) => Gate::Done(SchemaValidationResult::invalid(
            Some(present.clone()),
            ValidationResult::new(path.clone(), "invalidType", mismatch.to_string()),
        )),
    }
}

/// Runs `validators` against `value` in order, folding every outcome into
/// `result`.
pub(crate) async fn run_validators(
    validators: &[RegisteredValidator],
    value: &Value,
    path: &JsonPath,
    result: &mut SchemaValidationResult,
) {
    for validator in validators {
        let outcome = validator.run(value, path).await;
        result.extend_errors(outcome.errors);
        result.extend_successes(outcome.successes);
    }
}

/// The full orchestration for kinds without children.
pub(crate) async fn validate_scalar<P>(
    base: &SchemaBase,
    value: Option<&Value>,
    path: &JsonPath,
    parse: P,
) -> SchemaValidationResult
where
    P: FnOnce(&Value) -> Result<Value, TypeMismatch>,
{
    let parsed = match gate(base, value, path, parse) {
        Gate::Done(result) => return result,
        Gate::Parsed(parsed) => parsed,
    };

    let mut result = SchemaValidationResult::valid(None);
    run_validators(&base.validators, &parsed, path, &mut result).await;
    result.set_value(Some(parsed));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_string(value: &Value) -> Result<Value, TypeMismatch> {
        if value.is_string() {
            Ok(value.clone())
        } else {
            Err(TypeMismatch::new("string", value))
        }
    }

    fn failing(identifier: &'static str) -> RegisteredValidator {
        RegisteredValidator::new(
            identifier.to_string(),
            Arc::new(FnValidator::new(move |_: &Value, path: &JsonPath| {
                ValidatorOutcome::fail(ValidationResult::new(path.clone(), identifier, "failed"))
            })),
        )
    }

    #[tokio::test]
    async fn test_required_on_absent_null_and_empty() {
        let base = SchemaBase::default();
        for value in [None, Some(&json!(null)), Some(&json!(""))] {
            let result = validate_scalar(&base, value, &JsonPath::root(), parse_string).await;
            assert!(!result.is_valid());
            assert_eq!(result.errors()[0].identifier, "required");
            assert_eq!(result.errors()[0].message, "Required.");
        }
    }

    #[tokio::test]
    async fn test_optional_skips_validators() {
        let mut base = SchemaBase {
            optional: true,
            ..SchemaBase::default()
        };
        base.push(failing("never"));

        let result = validate_scalar(&base, None, &JsonPath::root(), parse_string).await;
        assert!(result.is_valid());
        assert_eq!(result.value(), None);

        let result = validate_scalar(&base, Some(&json!(null)), &JsonPath::root(), parse_string).await;
        assert!(result.is_valid());
        assert_eq!(result.value(), Some(&json!(null)));
    }

    #[tokio::test]
    async fn test_nullable_does_not_exempt_absent() {
        let base = SchemaBase {
            nullable: true,
            ..SchemaBase::default()
        };

        let result = validate_scalar(&base, Some(&json!(null)), &JsonPath::root(), parse_string).await;
        assert!(result.is_valid());

        let result = validate_scalar(&base, None, &JsonPath::root(), parse_string).await;
        assert_eq!(result.errors()[0].identifier, "required");
    }

    #[tokio::test]
    async fn test_invalid_type_message() {
        let base = SchemaBase::default();
        let result = validate_scalar(&base, Some(&json!(3)), &JsonPath::root(), parse_string).await;
        assert_eq!(result.errors()[0].identifier, "invalidType");
        assert_eq!(result.errors()[0].message, "Expected string, received number");
        assert_eq!(result.value(), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_all_validators_run_in_order() {
        let mut base = SchemaBase::default();
        base.push(failing("first"));
        base.push(failing("second"));

        let result = validate_scalar(&base, Some(&json!("x")), &JsonPath::root(), parse_string).await;
        let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["first", "second"]);
        assert_eq!(result.value(), Some(&json!("x")));
    }

    #[tokio::test]
    async fn test_message_and_rule_overrides() {
        let mut base = SchemaBase::default();
        base.push(failing("tooShort"));
        base.set_last_message("Pick a longer name.".to_string());
        base.set_last_rule(ValidationRule::new("minLength").with_parameters(vec![json!(3)]));

        let result = validate_scalar(&base, Some(&json!("x")), &JsonPath::root(), parse_string).await;
        let error = &result.errors()[0];
        assert_eq!(error.message, "Pick a longer name.");
        assert_eq!(
            error.validation_rule.as_ref().map(|r| r.identifier.as_str()),
            Some("minLength")
        );
    }

    #[tokio::test]
    async fn test_async_fn_validator() {
        let validator = AsyncFnValidator::new(|value: Value, path: JsonPath| async move {
            if value == json!("taken") {
                ValidatorOutcome::fail(ValidationResult::new(path, "taken", "Already taken."))
            } else {
                ValidatorOutcome::pass()
            }
        });

        let outcome = validator.check(&json!("taken"), &JsonPath::root()).await;
        assert!(!outcome.is_valid());
        let outcome = validator.check(&json!("free"), &JsonPath::root()).await;
        assert!(outcome.is_valid());
    }
}
