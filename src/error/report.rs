//! Validation report types.
//!
//! [`ValidationResult`] is the single record shape used for both errors and
//! successes. [`SchemaValidationResult`] aggregates them for one `validate`
//! call, and [`SchemaErrors`] is the non-empty error list used when a report
//! is turned into a stillwater `Validation` or a `Result`.

use std::fmt::{self, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stillwater::prelude::*;
use stillwater::Validation;

use crate::path::JsonPath;

/// Reference to the declarative rule that produced a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRule {
    /// Rule identifier, e.g. `maxLength`.
    pub identifier: String,
    /// Rule constraints, e.g. `[50]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,
}

impl ValidationRule {
    /// Creates a rule reference without parameters.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            parameters: None,
        }
    }

    /// Sets the rule parameters and returns self for chaining.
    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A single error or success, addressed by path.
///
/// # Example
///
/// ```rust
/// use preflight::{JsonPath, ValidationResult};
///
/// let error = ValidationResult::new(
///     JsonPath::root().push_field("email"),
///     "invalidEmailAddress",
///     "Invalid email address.",
/// );
///
/// assert_eq!(error.to_string(), "email: Invalid email address.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Location of the checked value.
    pub path: JsonPath,
    /// Machine-readable tag for the condition (e.g. `tooShort`).
    pub identifier: String,
    /// Human-readable message.
    pub message: String,
    /// The declarative rule this result came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_rule: Option<ValidationRule>,
}

impl ValidationResult {
    /// Creates a result with the given path, identifier and message.
    pub fn new(path: JsonPath, identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            identifier: identifier.into(),
            message: message.into(),
            validation_rule: None,
        }
    }

    /// Attaches a rule reference and returns self for chaining.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rule = Some(rule);
        self
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationResult {}

/// A non-empty collection of validation errors.
///
/// `SchemaErrors` implements `Semigroup`, so error lists from independent
/// validations can be combined:
///
/// ```rust
/// use preflight::{JsonPath, SchemaErrors, ValidationResult};
/// use stillwater::prelude::*;
///
/// let name = SchemaErrors::single(ValidationResult::new(
///     JsonPath::from_field("name"), "required", "Required.",
/// ));
/// let email = SchemaErrors::single(ValidationResult::new(
///     JsonPath::from_field("email"), "invalidEmailAddress", "Invalid email address.",
/// ));
///
/// assert_eq!(name.combine(email).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<ValidationResult>);

impl SchemaErrors {
    /// Wraps one error.
    pub fn single(error: ValidationResult) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Wraps `errors`; `None` when there are none.
    pub fn from_vec(errors: Vec<ValidationResult>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationResult> {
        self.0.iter()
    }

    /// The earliest reported error.
    pub fn first(&self) -> &ValidationResult {
        self.0.head()
    }

    /// Errors located exactly at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&ValidationResult> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Errors tagged with `identifier`.
    pub fn with_identifier(&self, identifier: &str) -> Vec<&ValidationResult> {
        self.0.iter().filter(|e| e.identifier == identifier).collect()
    }

    /// Unwraps into a plain vector.
    pub fn into_vec(self) -> Vec<ValidationResult> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.len())?;
        self.iter().try_for_each(|error| write!(f, "\n- {error}"))
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = ValidationResult;
    type IntoIter = std::vec::IntoIter<ValidationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};

/// The outcome of one `validate` call.
///
/// `valid` is true exactly when `errors` is empty. Errors can only be
/// appended through methods that also clear `valid`, so the two never
/// disagree. `value` is the parsed value; `None` stands for an absent
/// (undefined) value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaValidationResult {
    valid: bool,
    value: Option<Value>,
    errors: Vec<ValidationResult>,
    successes: Vec<ValidationResult>,
}

impl SchemaValidationResult {
    /// A valid result carrying `value`, with no errors or successes.
    pub fn valid(value: Option<Value>) -> Self {
        Self {
            valid: true,
            value,
            errors: Vec::new(),
            successes: Vec::new(),
        }
    }

    /// An invalid result carrying `value` and a single error.
    pub fn invalid(value: Option<Value>, error: ValidationResult) -> Self {
        Self {
            valid: false,
            value,
            errors: vec![error],
            successes: Vec::new(),
        }
    }

    /// True when no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The parsed value, or `None` for an absent value.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Errors in the order they were recorded.
    pub fn errors(&self) -> &[ValidationResult] {
        &self.errors
    }

    /// Successes in the order they were recorded.
    pub fn successes(&self) -> &[ValidationResult] {
        &self.successes
    }

    /// Returns all errors at the specified path.
    pub fn errors_at(&self, path: &JsonPath) -> Vec<&ValidationResult> {
        self.errors.iter().filter(|e| &e.path == path).collect()
    }

    /// Consumes the result, returning the parsed value.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Records an error and marks the result invalid.
    pub fn push_error(&mut self, error: ValidationResult) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Records a success.
    pub fn push_success(&mut self, success: ValidationResult) {
        self.successes.push(success);
    }

    /// Appends errors, marking the result invalid if any were given.
    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = ValidationResult>) {
        for error in errors {
            self.push_error(error);
        }
    }

    /// Appends successes.
    pub fn extend_successes(&mut self, successes: impl IntoIterator<Item = ValidationResult>) {
        self.successes.extend(successes);
    }

    /// Folds a child result into this one, returning the child's value.
    pub fn absorb(&mut self, child: SchemaValidationResult) -> Option<Value> {
        self.extend_errors(child.errors);
        self.extend_successes(child.successes);
        child.value
    }

    /// Replaces the carried value.
    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    /// Deserializes the parsed value into a concrete type.
    ///
    /// An absent value deserializes from `null`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.value.clone().unwrap_or(Value::Null))
    }

    /// Converts into a stillwater `Validation`.
    pub fn into_validation(self) -> crate::Validated<Option<Value>> {
        match SchemaErrors::from_vec(self.errors) {
            None => Validation::Success(self.value),
            Some(errors) => Validation::Failure(errors),
        }
    }

    /// Converts into a `Result`, dropping successes.
    pub fn into_result(self) -> Result<Option<Value>, SchemaErrors> {
        self.into_validation().into_result()
    }
}
