//! Object schemas: field paths, nested shapes and object-level checks.

use preflight::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

fn signup() -> preflight::ObjectSchema {
    Schema::object()
        .field("username", Schema::string().minimum_length(3).maximum_length(20))
        .field("email", Schema::string().email_address())
        .field("age", Schema::number().integer().minimum(13).optional())
        .field(
            "tags",
            Schema::array(Schema::string().not_empty()).maximum_items(3),
        )
        .field(
            "address",
            Schema::object()
                .field("city", Schema::string())
                .field("zip", Schema::string().minimum_length(5)),
        )
}

#[tokio::test]
async fn test_valid_object() {
    let result = signup()
        .validate(&json!({
            "username": "ada",
            "email": "ada@example.com",
            "tags": ["math"],
            "address": {"city": "London", "zip": "NW1 6XE"}
        }))
        .await;
    assert!(result.is_valid(), "{:?}", result.errors());
}

#[tokio::test]
async fn test_errors_in_field_order_with_paths() {
    let result = signup()
        .validate(&json!({
            "username": "ad",
            "email": "nope",
            "age": 12,
            "tags": ["ok", ""],
            "address": {"zip": "1"}
        }))
        .await;

    let reported: Vec<_> = result
        .errors()
        .iter()
        .map(|e| (e.path.to_dotted(), e.identifier.as_str()))
        .collect();
    assert_eq!(
        reported,
        vec![
            ("username".to_string(), "tooShort"),
            ("email".to_string(), "invalidEmailAddress"),
            ("age".to_string(), "tooSmall"),
            ("tags.1".to_string(), "required"),
            ("address.city".to_string(), "required"),
            ("address.zip".to_string(), "tooShort"),
        ]
    );
}

#[tokio::test]
async fn test_errors_at_path() {
    let result = signup().validate(&json!({})).await;
    let at_email = result.errors_at(&JsonPath::from_field("email"));
    assert_eq!(at_email.len(), 1);
    assert_eq!(at_email[0].identifier, "required");
}

#[tokio::test]
async fn test_object_validator_errors_accumulate_with_field_errors() {
    let schema = Schema::object()
        .field("start", Schema::number())
        .field("end", Schema::number())
        .add_validator("ordered", |value: &Value, path: &JsonPath| {
            let start = value.get("start").and_then(Value::as_f64);
            let end = value.get("end").and_then(Value::as_f64);
            match (start, end) {
                (Some(start), Some(end)) if start > end => ValidatorOutcome::fail(
                    ValidationResult::new(path.push_field("end"), "beforeStart", "End must follow start."),
                ),
                _ => ValidatorOutcome::pass(),
            }
        })
        .add_validator("alwaysFails", |_: &Value, path: &JsonPath| {
            ValidatorOutcome::fail(ValidationResult::new(path.clone(), "rejected", "Rejected."))
        });

    let result = schema.validate(&json!({"start": 5, "end": 1})).await;
    let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["beforeStart", "rejected"]);

    let result = schema.validate(&json!({"start": "bad", "end": 1})).await;
    let identifiers: Vec<_> = result.errors().iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["invalidType", "rejected"]);
    assert!(result.errors()[1].path.is_root());
}

#[tokio::test]
async fn test_value_keys_follow_declaration_order() {
    let schema = Schema::object()
        .field("zeta", Schema::string())
        .field("alpha", Schema::string())
        .field("mid", Schema::number().optional());

    let result = schema
        .validate(&json!({"mid": 1, "alpha": "a", "zeta": "z"}))
        .await;
    assert_eq!(
        serde_json::to_string(result.value().unwrap()).unwrap(),
        r#"{"zeta":"z","alpha":"a","mid":1}"#
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct Profile {
    name: String,
    age: Option<u32>,
}

#[tokio::test]
async fn test_typed_output_ignores_unknown_keys() {
    let schema = Schema::object()
        .field("name", Schema::string())
        .field("age", Schema::number().integer().optional());

    let result = schema
        .validate(&json!({"name": "Ada", "admin": true}))
        .await;
    assert_eq!(result.value(), Some(&json!({"name": "Ada"})));
    assert_eq!(
        result.deserialize::<Profile>().unwrap(),
        Profile {
            name: "Ada".to_string(),
            age: None
        }
    );
}

#[test]
fn test_defaults_for_form_state() {
    let defaults = signup().get_defaults();
    assert_eq!(
        serde_json::to_string(&defaults).unwrap(),
        r#"{"username":"","email":"","tags":[]}"#
    );
}
