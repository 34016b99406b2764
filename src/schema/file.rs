//! File schema validation.
//!
//! A file-like value is a JSON object carrying the observable attributes of
//! an uploaded file: `name`, `type` (MIME) and `size` in bytes. Extra
//! attributes (e.g. `lastModified`) are kept in the parsed value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SchemaValidationResult, TypeMismatch, ValidationResult};
use crate::path::JsonPath;
use crate::validation::{validate_scalar, SchemaBase, ValidatorOutcome};

use super::traits::{SchemaBuilder, SchemaLike};

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Typed view of a file-like value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File name.
    pub name: String,
    /// MIME type, e.g. `image/png`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileInfo {
    /// Creates a file description.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Reads a file description from a JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        FileInfo::deserialize(value).ok()
    }

    /// Renders the description as the JSON object validated by [`FileSchema`].
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "type": self.mime_type,
            "size": self.size,
        })
    }
}

/// A schema for validating file-like values.
///
/// The configured constraints stay readable on the schema so a UI can show
/// hints such as "max 5.0 MB" without re-deriving them.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use preflight::FileInfo;
///
/// let schema = Schema::file()
///     .mime_type(["image/png", "image/jpeg"])
///     .maximum_size_in_bytes(5 * 1024 * 1024);
///
/// assert_eq!(schema.maximum_size(), Some(5 * 1024 * 1024));
///
/// let upload = FileInfo::new("notes.txt", "text/plain", 10).to_value();
/// let result = futures::executor::block_on(schema.validate(&upload));
/// assert_eq!(result.errors()[0].identifier, "invalidMimeType");
/// ```
#[derive(Debug, Clone)]
pub struct FileSchema {
    base: SchemaBase,
    allowed_mime_types: Option<Vec<String>>,
    maximum_size: Option<u64>,
    minimum_size: Option<u64>,
}

impl FileSchema {
    /// Creates a new file schema with no constraints.
    pub fn new() -> Self {
        Self {
            base: SchemaBase::default(),
            allowed_mime_types: None,
            maximum_size: None,
            minimum_size: None,
        }
    }

    /// Fails with `invalidMimeType` unless the file's MIME type is listed.
    pub fn mime_type<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        self.allowed_mime_types = Some(allowed.clone());

        let message = format!("File type must be one of: {}.", allowed.join(", "));
        self.check_file("mimeType", move |file, path| {
            if allowed.iter().any(|mime| *mime == file.mime_type) {
                ValidatorOutcome::pass()
            } else {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "invalidMimeType",
                    message.clone(),
                ))
            }
        })
    }

    /// Fails with `fileTooLarge` when the file exceeds `max` bytes.
    ///
    /// The message states the limit in megabytes with one decimal.
    pub fn maximum_size_in_bytes(mut self, max: u64) -> Self {
        self.maximum_size = Some(max);

        let message = format!("File must be at most {:.1} MB.", max as f64 / BYTES_PER_MB);
        self.check_file("maximumSizeInBytes", move |file, path| {
            if file.size > max {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "fileTooLarge",
                    message.clone(),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// Fails with `fileTooSmall` when the file is under `min` bytes.
    ///
    /// The message states the limit in kilobytes with one decimal.
    pub fn minimum_size_in_bytes(mut self, min: u64) -> Self {
        self.minimum_size = Some(min);

        let message = format!("File must be at least {:.1} KB.", min as f64 / BYTES_PER_KB);
        self.check_file("minimumSizeInBytes", move |file, path| {
            if file.size < min {
                ValidatorOutcome::fail(ValidationResult::new(
                    path.clone(),
                    "fileTooSmall",
                    message.clone(),
                ))
            } else {
                ValidatorOutcome::pass()
            }
        })
    }

    /// MIME types accepted by the last `mime_type` call.
    pub fn allowed_mime_types(&self) -> Option<&[String]> {
        self.allowed_mime_types.as_deref()
    }

    /// The configured maximum size in bytes.
    pub fn maximum_size(&self) -> Option<u64> {
        self.maximum_size
    }

    /// The configured minimum size in bytes.
    pub fn minimum_size(&self) -> Option<u64> {
        self.minimum_size
    }

    fn check_file<F>(self, identifier: &str, check: F) -> Self
    where
        F: Fn(&FileInfo, &JsonPath) -> ValidatorOutcome + Send + Sync + 'static,
    {
        self.add_validator(identifier, move |value: &Value, path: &JsonPath| {
            match FileInfo::from_value(value) {
                Some(file) => check(&file, path),
                None => ValidatorOutcome::pass(),
            }
        })
    }
}

impl Default for FileSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(value: &Value) -> Result<Value, TypeMismatch> {
    match FileInfo::from_value(value) {
        Some(_) => Ok(value.clone()),
        None => Err(TypeMismatch::new("File", value)),
    }
}

#[async_trait]
impl SchemaLike for FileSchema {
    fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn type_name(&self) -> &'static str {
        "File"
    }

    async fn validate_at(&self, value: Option<&Value>, path: &JsonPath) -> SchemaValidationResult {
        validate_scalar(&self.base, value, path, parse).await
    }
}

impl SchemaBuilder for FileSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}
