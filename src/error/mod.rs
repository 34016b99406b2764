//! Validation reports and boundary failures.
//!
//! Validation failures are data: [`ValidationResult`] entries collected into a
//! [`SchemaValidationResult`]. The Rust error types in this module cover only
//! the boundaries where foreign code can fail: a value of the wrong runtime
//! type ([`TypeMismatch`]) and an injected remote checker
//! ([`RemoteCheckError`]).

mod failure;
mod report;

pub use failure::{value_type_name, RemoteCheckError, TypeMismatch};
pub use report::{SchemaErrors, SchemaValidationResult, ValidationResult, ValidationRule};
