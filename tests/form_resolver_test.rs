//! The `{values, errors}` resolver adapter.

#![cfg(feature = "form-resolver")]

use preflight::interop::form_resolver::{resolve, ROOT_KEY};
use preflight::prelude::*;
use serde_json::json;

fn contact_form() -> preflight::ObjectSchema {
    Schema::object()
        .field("name", Schema::string().minimum_length(2))
        .field(
            "emails",
            Schema::array(Schema::string().email_address().minimum_length(8)),
        )
}

#[tokio::test]
async fn test_valid_submission() {
    let resolved = resolve(
        &contact_form(),
        &json!({"name": "Ada", "emails": ["ada@example.com"], "extra": 1}),
    )
    .await;
    assert!(resolved.is_valid());
    assert_eq!(
        resolved.values,
        json!({"name": "Ada", "emails": ["ada@example.com"]})
    );
}

#[tokio::test]
async fn test_first_error_per_field() {
    let resolved = resolve(&contact_form(), &json!({"name": "A", "emails": ["ok@example.com", "x"]})).await;

    assert_eq!(resolved.values, json!({}));
    let keys: Vec<_> = resolved.errors.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "emails.1"]);
    assert_eq!(resolved.errors["emails.1"].error_type, "invalidEmailAddress");
}

#[tokio::test]
async fn test_root_errors() {
    let resolved = resolve(&contact_form(), &json!([])).await;
    assert_eq!(resolved.errors[ROOT_KEY].error_type, "invalidType");
    assert_eq!(resolved.errors[ROOT_KEY].message, "Expected object, received array");
}

#[tokio::test]
async fn test_serializes_for_form_libraries() {
    let resolved = resolve(&contact_form(), &json!({"emails": []})).await;
    assert_eq!(
        serde_json::to_value(&resolved).unwrap(),
        json!({
            "values": {},
            "errors": {"name": {"type": "required", "message": "Required."}}
        })
    );
}

#[tokio::test]
async fn test_values_keep_schema_order() {
    let schema = Schema::object()
        .field("zip", Schema::string())
        .field("city", Schema::string());
    let resolved = resolve(&schema, &json!({"city": "Paris", "zip": "75001"})).await;
    assert_eq!(
        serde_json::to_string(&resolved.values).unwrap(),
        r#"{"zip":"75001","city":"Paris"}"#
    );
}
