#![allow(clippy::unwrap_used, clippy::expect_used)]

use apicontract::spec::{load_document, load_spec, ValidationSchema};

mod common;
use common::{specs, temp_files};

#[test]
fn test_load_yaml_spec_in_declaration_order() {
    let file = temp_files::create_temp_yaml(specs::PET_STORE);
    let endpoints = load_spec(file.path(), true).unwrap();
    let keys: Vec<&str> = endpoints.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "get:/pets",
            "post:/pets",
            "get:/pets/mine",
            "get:/pets/{petId}",
            "delete:/pets/{petId}",
            "put:/owners/{ownerId}/pets/{petId}",
        ]
    );
}

#[test]
fn test_refs_are_expanded_before_compiling() {
    let file = temp_files::create_temp_yaml(specs::PET_STORE);
    let endpoints = load_spec(file.path(), true).unwrap();

    let body = endpoints["post:/pets"].request_body_schema.as_ref().unwrap();
    assert_eq!(body.required, vec!["name".to_string()]);
    match &body.properties["status"] {
        ValidationSchema::String(s) => {
            assert_eq!(s.full_path, "requestBody.status");
            let values: Vec<&str> = s.enum_values.as_ref().unwrap().iter().map(String::as_str).collect();
            assert_eq!(values, vec!["available", "pending", "sold"]);
        }
        other => panic!("expected string schema, got {other:?}"),
    }
}

#[test]
fn test_without_dereference_refs_fail_to_compile() {
    let file = temp_files::create_temp_yaml(specs::PET_STORE);
    let err = load_spec(file.path(), false).unwrap_err();
    assert!(format!("{err:#}").contains("spec compilation failed"), "{err:#}");
}

#[test]
fn test_load_json_spec() {
    let file = temp_files::create_temp_json(
        r#"{ "paths": { "/health": { "get": {} }, "/items/{id}": { "get": {
            "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }]
        } } } }"#,
    );
    let endpoints = load_spec(file.path(), true).unwrap();
    assert_eq!(endpoints.len(), 2);
    assert!(endpoints["get:/health"].path_params_schema.is_none());
    assert!(endpoints["get:/items/{id}"].path_params_schema.is_some());
}

#[test]
fn test_unreadable_and_malformed_files() {
    let err = load_document(std::path::Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read spec file"));

    let file = temp_files::create_temp_json("{ not json");
    let err = load_document(file.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse JSON spec"));
}

#[test]
fn test_dangling_ref_is_reported_with_context() {
    let file = temp_files::create_temp_yaml(
        r#"
paths:
  /pets:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Missing'
"#,
    );
    let err = load_spec(file.path(), true).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("failed to dereference"), "{msg}");
    assert!(msg.contains("unresolvable $ref"), "{msg}");
}
