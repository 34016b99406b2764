//! # Preflight
//!
//! Composable, async schema validation for form and API input.
//!
//! Schemas describe the expected shape of a JSON value: strings, numbers,
//! booleans, file descriptors, arrays and objects, each with chained
//! constraints. Validation accumulates every failure with its location
//! instead of stopping at the first one, and validators may be async, so a
//! check such as "is this username still available" composes with local
//! rules.
//!
//! ## Core Types
//!
//! - [`Schema`]: factory for every schema kind
//! - [`SchemaLike`] / [`SchemaBuilder`]: validation and configuration traits
//! - [`SchemaValidationResult`]: the report of one `validate` call
//! - [`ValidationResult`]: one error or success with its [`JsonPath`]
//! - [`AvailabilityCheck`]: injected remote check used by
//!   [`StringSchema::remote_check`]
//!
//! ## Example
//!
//! ```rust
//! use preflight::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("username", Schema::string().minimum_length(3))
//!     .field("email", Schema::string().email_address())
//!     .field("age", Schema::number().integer().minimum(13).optional());
//!
//! let result = futures::executor::block_on(schema.validate(&json!({
//!     "username": "al",
//!     "email": "not-an-email"
//! })));
//!
//! assert!(!result.is_valid());
//! let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
//! assert_eq!(identifiers, vec!["tooShort", "invalidEmailAddress"]);
//! ```
//!
//! ## Features
//!
//! - `graphql` (default): [`interop::graphql`], schemas compiled from input
//!   type metadata.
//! - `form-resolver` (default): [`interop::form_resolver`], the
//!   `{values, errors}` adapter for form libraries.

pub mod error;
pub mod interop;
pub mod path;
pub mod remote;
pub mod schema;
pub mod validation;

pub use error::{
    value_type_name, RemoteCheckError, SchemaErrors, SchemaValidationResult, TypeMismatch,
    ValidationResult, ValidationRule,
};
pub use path::{JsonPath, PathSegment};
pub use remote::{Availability, AvailabilityCheck, CheckFn, RemoteCheckValidator};
pub use schema::{
    ArraySchema, BooleanSchema, FileInfo, FileSchema, NumberSchema, ObjectSchema, Schema,
    SchemaBuilder, SchemaLike, StringSchema,
};
pub use validation::{AsyncFnValidator, FnValidator, SchemaBase, Validator, ValidatorOutcome};

/// A validation report as a stillwater `Validation`.
pub type Validated<T> = stillwater::Validation<T, SchemaErrors>;

/// The names most call sites need.
pub mod prelude {
    pub use crate::error::{SchemaValidationResult, ValidationResult};
    pub use crate::path::JsonPath;
    pub use crate::schema::{Schema, SchemaBuilder, SchemaLike};
    pub use crate::validation::ValidatorOutcome;
}
