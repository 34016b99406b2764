//! Schema definitions for validation.
//!
//! Each schema kind validates one shape of value and accumulates every
//! failure instead of stopping at the first one. Schemas are built through
//! the [`Schema`] factory and configured with chained [`SchemaBuilder`]
//! calls.
//!
//! # Example
//!
//! ```rust
//! use preflight::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::object().field(
//!     "user",
//!     Schema::object().field("email", Schema::string().email_address()),
//! );
//!
//! let result = futures::executor::block_on(schema.validate(&json!({
//!     "user": {"email": "bad"}
//! })));
//! assert_eq!(result.errors()[0].path.to_segments(), vec!["user", "email"]);
//! assert_eq!(result.errors()[0].identifier, "invalidEmailAddress");
//! ```

mod array;
mod boolean;
mod file;
mod numeric;
mod object;
mod string;
mod traits;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use file::{FileInfo, FileSchema};
pub use numeric::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use traits::{SchemaBuilder, SchemaLike};

/// Entry point for creating validation schemas.
///
/// The factory is the supported way to construct schemas. `optional` and
/// `nullable` are also available as free functions for call sites that
/// prefer wrapping over chaining.
pub struct Schema;

impl Schema {
    /// Creates a string schema. Implicit default: `""`.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a number schema. No implicit default.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a boolean schema. No implicit default.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a file schema.
    pub fn file() -> FileSchema {
        FileSchema::new()
    }

    /// Creates an array schema applying `item_schema` to every element.
    /// Implicit default: `[]`.
    pub fn array<S: SchemaLike>(item_schema: S) -> ArraySchema<S> {
        ArraySchema::new(item_schema)
    }

    /// Creates an object schema with no fields; add them with `field`.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Marks `schema` optional. Same as `schema.optional()`.
    ///
    /// ```rust
    /// use preflight::prelude::*;
    ///
    /// let schema = Schema::optional(Schema::number());
    /// assert!(schema.is_optional());
    /// ```
    pub fn optional<S: SchemaBuilder>(schema: S) -> S {
        schema.optional()
    }

    /// Marks `schema` nullable. Same as `schema.nullable()`.
    pub fn nullable<S: SchemaBuilder>(schema: S) -> S {
        schema.nullable()
    }
}
