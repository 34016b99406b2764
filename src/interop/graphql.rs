//! Schemas compiled from GraphQL input-type metadata.
//!
//! A backend that describes its input types (field name, kind, scalar type,
//! required flag, validation rules) can drive client-side validation
//! directly: [`compile`] turns that description into an [`ObjectSchema`], so
//! the two stay in sync.
//!
//! Compilation never fails. Unknown kinds and scalar types fall back to a
//! string schema; unknown or malformed rules add no constraint. Skipped
//! rules are logged in debug builds only.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationRule;
use crate::schema::{BooleanSchema, NumberSchema, ObjectSchema, Schema, SchemaBuilder, StringSchema};

/// Metadata describing a remote input object type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputObjectTypeMetadata {
    /// Field descriptors in the remote definition's order.
    pub fields: Vec<FieldMetadata>,
}

impl InputObjectTypeMetadata {
    /// Reads metadata from its JSON form.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// One field of an input type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldMetadata {
    /// Field name.
    pub name: String,
    /// GraphQL type kind.
    pub kind: FieldKind,
    /// Whether the field is non-nullable in the remote definition.
    #[serde(default)]
    pub required: bool,
    /// Scalar name (`"String"`) or a named reference (`{"type": "Role"}`).
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,
    /// Validation rules in declaration order. Entries that are not rule
    /// descriptors are dropped while loading.
    #[serde(default, deserialize_with = "well_formed_rules")]
    pub validation: Vec<RuleDescriptor>,
}

/// GraphQL type kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A scalar (`String`, `Int`, ...).
    Scalar,
    /// An enum.
    Enum,
    /// A nested input object.
    Object,
    /// A list.
    List,
    /// Any kind this crate does not know.
    #[serde(other)]
    Other,
}

/// The type reference of a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A bare scalar name.
    Named(String),
    /// A reference object, used for enums and input objects.
    Reference {
        /// Referenced type name.
        #[serde(rename = "type")]
        name: String,
    },
}

impl FieldType {
    /// The referenced type name.
    pub fn name(&self) -> &str {
        match self {
            FieldType::Named(name) | FieldType::Reference { name } => name,
        }
    }
}

/// A declarative validation rule, e.g. `{"type": "maxLength", "constraints": [50]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleDescriptor {
    /// Rule name.
    #[serde(rename = "type")]
    pub rule_type: String,
    /// Rule arguments. Anything other than a list loads as `None`.
    #[serde(default, deserialize_with = "constraint_list")]
    pub constraints: Option<Vec<Value>>,
}

fn well_formed_rules<'de, D>(deserializer: D) -> Result<Vec<RuleDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(raw
        .iter()
        .filter_map(|entry| match RuleDescriptor::deserialize(entry) {
            Ok(rule) => Some(rule),
            Err(error) => {
                if cfg!(debug_assertions) {
                    warn!(%error, "dropping malformed validation rule");
                }
                None
            }
        })
        .collect())
}

fn constraint_list<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(constraints) => Ok(Some(constraints)),
        _ => Ok(None),
    }
}

impl RuleDescriptor {
    fn constraint_usize(&self, index: usize) -> Option<usize> {
        self.constraints
            .as_ref()?
            .get(index)?
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
    }

    fn reference(&self) -> ValidationRule {
        let rule = ValidationRule::new(self.rule_type.as_str());
        match &self.constraints {
            Some(constraints) => rule.with_parameters(constraints.clone()),
            None => rule,
        }
    }
}

/// Rules with a string-schema counterpart.
const STRING_RULES: &[&str] = &["maxLength", "minLength", "isLength", "isEmail", "isNotEmpty"];

enum FieldSchema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
}

impl FieldSchema {
    fn for_field(field: &FieldMetadata) -> Self {
        let scalar = match (field.kind, &field.field_type) {
            (FieldKind::Scalar, Some(field_type)) => field_type.name(),
            _ => "",
        };
        match scalar {
            "Int" | "Float" => FieldSchema::Number(Schema::number()),
            "Boolean" => FieldSchema::Boolean(Schema::boolean()),
            // String, DateTimeISO, enums, objects, lists and unknown scalars.
            _ => FieldSchema::String(Schema::string()),
        }
    }

    fn apply(self, field: &str, rule: &RuleDescriptor) -> Self {
        if !STRING_RULES.contains(&rule.rule_type.as_str()) {
            skipped(field, rule, "unrecognized rule");
            return self;
        }
        match self {
            FieldSchema::String(schema) => FieldSchema::String(apply_string_rule(schema, field, rule)),
            other => other,
        }
    }

    fn into_object_field(self, object: ObjectSchema, name: &str, required: bool) -> ObjectSchema {
        match self {
            FieldSchema::String(schema) => object.field(name, optional_unless(schema, required)),
            FieldSchema::Number(schema) => object.field(name, optional_unless(schema, required)),
            FieldSchema::Boolean(schema) => object.field(name, optional_unless(schema, required)),
        }
    }
}

fn optional_unless<S: SchemaBuilder>(schema: S, required: bool) -> S {
    if required {
        schema
    } else {
        schema.optional()
    }
}

fn apply_string_rule(schema: StringSchema, field: &str, rule: &RuleDescriptor) -> StringSchema {
    let reference = rule.reference();
    match rule.rule_type.as_str() {
        "maxLength" => match rule.constraint_usize(0) {
            Some(max) => schema.maximum_length(max).rule(reference),
            None => {
                skipped(field, rule, "missing length constraint");
                schema
            }
        },
        "minLength" => match rule.constraint_usize(0) {
            Some(min) => schema.minimum_length(min).rule(reference),
            None => {
                skipped(field, rule, "missing length constraint");
                schema
            }
        },
        "isLength" => {
            let schema = match rule.constraint_usize(0) {
                Some(min) => schema.minimum_length(min).rule(reference.clone()),
                None => {
                    skipped(field, rule, "missing minimum length constraint");
                    schema
                }
            };
            match rule.constraint_usize(1) {
                Some(max) => schema.maximum_length(max).rule(reference),
                None => schema,
            }
        }
        "isEmail" => schema.email_address().rule(reference),
        "isNotEmpty" => schema.not_empty().rule(reference),
        _ => schema,
    }
}

fn skipped(field: &str, rule: &RuleDescriptor, reason: &str) {
    if cfg!(debug_assertions) {
        warn!(field, rule = %rule.rule_type, reason, "skipping validation rule");
    }
}

/// Compiles every field of `metadata` into an object schema.
///
/// # Example
///
/// ```rust
/// use preflight::prelude::*;
/// use preflight::interop::graphql::{compile, InputObjectTypeMetadata};
/// use serde_json::json;
///
/// let metadata = InputObjectTypeMetadata::from_json(&json!({
///     "fields": [
///         {"name": "title", "kind": "scalar", "type": "String", "required": true,
///          "validation": [{"type": "maxLength", "constraints": [5]}]},
///         {"name": "pages", "kind": "scalar", "type": "Int", "required": false}
///     ]
/// })).unwrap();
///
/// let schema = compile(&metadata);
/// let result = futures::executor::block_on(schema.validate(&json!({"title": "Too long"})));
/// assert_eq!(result.errors()[0].identifier, "tooLong");
/// ```
pub fn compile(metadata: &InputObjectTypeMetadata) -> ObjectSchema {
    compile_selected(metadata, None)
}

/// Compiles the fields of `metadata` named in `only`, or all fields when
/// `only` is `None`. The metadata's field order is kept either way.
pub fn compile_selected(metadata: &InputObjectTypeMetadata, only: Option<&[&str]>) -> ObjectSchema {
    metadata
        .fields
        .iter()
        .filter(|field| only.map_or(true, |names| names.contains(&field.name.as_str())))
        .fold(Schema::object(), |object, field| {
            field
                .validation
                .iter()
                .fold(FieldSchema::for_field(field), |schema, rule| {
                    schema.apply(&field.name, rule)
                })
                .into_object_field(object, &field.name, field.required)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaLike;
    use serde_json::json;

    fn metadata(fields: Value) -> InputObjectTypeMetadata {
        InputObjectTypeMetadata::from_json(&json!({ "fields": fields })).unwrap()
    }

    #[test]
    fn test_base_schema_per_scalar() {
        let schema = compile(&metadata(json!([
            {"name": "a", "kind": "scalar", "type": "String"},
            {"name": "b", "kind": "scalar", "type": "DateTimeISO"},
            {"name": "c", "kind": "scalar", "type": "Int"},
            {"name": "d", "kind": "scalar", "type": "Float"},
            {"name": "e", "kind": "scalar", "type": "Boolean"},
            {"name": "f", "kind": "enum", "type": {"type": "Role"}},
            {"name": "g", "kind": "list"},
            {"name": "h", "kind": "union", "type": "Whatever"}
        ])));

        let types: Vec<_> = schema.fields().map(|(_, s)| s.type_name()).collect();
        assert_eq!(
            types,
            vec!["string", "string", "number", "number", "boolean", "string", "string", "string"]
        );
    }

    #[test]
    fn test_required_flag() {
        let schema = compile(&metadata(json!([
            {"name": "title", "kind": "scalar", "type": "String", "required": true},
            {"name": "subtitle", "kind": "scalar", "type": "String", "required": false}
        ])));
        assert!(!schema.get("title").unwrap().is_optional());
        assert!(schema.get("subtitle").unwrap().is_optional());
    }

    #[test]
    fn test_rule_references_are_stamped() {
        let schema = compile(&metadata(json!([
            {"name": "title", "kind": "scalar", "type": "String", "required": true,
             "validation": [{"type": "isLength", "constraints": [2, 4]}]}
        ])));
        let title = schema.get("title").unwrap();
        assert_eq!(
            title.base().validator_identifiers(),
            vec!["minimumLength", "maximumLength"]
        );
    }

    #[test]
    fn test_unknown_and_malformed_rules_add_nothing() {
        let schema = compile(&metadata(json!([
            {"name": "title", "kind": "scalar", "type": "String",
             "validation": [
                 {"type": "isUUID"},
                 {"type": "maxLength", "constraints": ["ten"]},
                 {"type": "maxLength"}
             ]},
            {"name": "count", "kind": "scalar", "type": "Int",
             "validation": [{"type": "isEmail"}]}
        ])));
        assert!(schema.get("title").unwrap().base().validator_identifiers().is_empty());
        assert!(schema.get("count").unwrap().base().validator_identifiers().is_empty());
    }

    #[test]
    fn test_malformed_rule_shapes_still_load() {
        let loaded = metadata(json!([
            {"name": "title", "kind": "scalar", "type": "String",
             "validation": [
                 {"type": "maxLength", "constraints": 5},
                 {"constraints": [3]},
                 "isEmail",
                 {"type": "minLength", "constraints": [2]}
             ]},
            {"name": "body", "kind": "scalar", "type": "String", "validation": "isNotEmpty"}
        ]));

        let title = &loaded.fields[0];
        assert_eq!(title.validation.len(), 2);
        assert_eq!(title.validation[0].constraints, None);
        assert!(loaded.fields[1].validation.is_empty());

        let schema = compile(&loaded);
        assert_eq!(
            schema.get("title").unwrap().base().validator_identifiers(),
            vec!["minimumLength"]
        );
    }

    #[test]
    fn test_selected_fields_keep_metadata_order() {
        let schema = compile_selected(
            &metadata(json!([
                {"name": "a", "kind": "scalar", "type": "String"},
                {"name": "b", "kind": "scalar", "type": "String"},
                {"name": "c", "kind": "scalar", "type": "String"}
            ])),
            Some(&["c", "a"][..]),
        );
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
