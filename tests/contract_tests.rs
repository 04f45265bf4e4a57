#![allow(clippy::unwrap_used, clippy::expect_used)]

use apicontract::validator::{RequestParts, Violation};
use apicontract::{ApiContract, IncomingRequest};
use http::StatusCode;
use serde_json::json;

mod common;
use common::{specs, temp_files};

fn pet_store() -> ApiContract {
    let file = temp_files::create_temp_yaml(specs::PET_STORE);
    ApiContract::load(file.path(), true).unwrap()
}

#[test]
fn test_valid_request_passes_with_parts() {
    let contract = pet_store();
    let validated = contract
        .check_request(IncomingRequest::new("GET", "/pets/7"))
        .unwrap();
    assert_eq!(validated.endpoint_key(), "get:/pets/{petId}");
    assert_eq!(validated.parts.path_params, Some(json!({ "petId": "7" })));
    assert_eq!(validated.parts.query_params, None);
}

#[test]
fn test_undeclared_route_is_404() {
    let contract = pet_store();
    let resp = contract
        .check_request(IncomingRequest::new("GET", "/cats"))
        .unwrap_err();
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body, json!({ "error": "not found" }));
}

#[test]
fn test_missing_required_body_is_single_violation() {
    let contract = pet_store();
    let resp = contract
        .check_request(IncomingRequest::new("POST", "/pets"))
        .unwrap_err();
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.body,
        json!([{ "property": "requestBody", "error": "required but not present" }])
    );
}

#[test]
fn test_body_violations_are_all_reported_in_order() {
    let contract = pet_store();
    let req = IncomingRequest::new("POST", "/pets").with_body(json!({
        "status": "lost",
        "age": -1,
        "tags": ["a", 2],
        "colour": "red"
    }));
    let resp = contract.check_request(req).unwrap_err();
    assert_eq!(
        resp.body,
        json!([
            { "property": "requestBody.name", "error": "required field is not present" },
            { "property": "requestBody.status", "error": "invalid value - must be one of: available, pending, sold" },
            { "property": "requestBody.age", "error": "must be greater than or equal to 0" },
            { "property": "requestBody.tags.1", "error": "invalid data type - string expected" },
            { "property": "requestBody.colour", "error": "field is not permitted" }
        ])
    );
}

#[test]
fn test_query_string_is_decoded_and_checked() {
    let contract = pet_store();

    let ok = contract.check_request(
        IncomingRequest::new("GET", "/pets?limit=10&status=sold&tags=a%7Cb"),
    );
    assert!(ok.is_ok(), "{ok:?}");

    let resp = contract
        .check_request(IncomingRequest::new("GET", "/pets").with_query("limit=500&tags=&page=2"))
        .unwrap_err();
    assert_eq!(
        resp.body,
        json!([
            { "property": "queryParams.limit", "error": "must be less than or equal to 50" },
            { "property": "queryParams.tags", "error": "must contain at least 1 item" },
            { "property": "queryParams.page", "error": "field is not permitted" }
        ])
    );
}

#[test]
fn test_unexpected_parts_on_endpoint_without_inputs() {
    let contract = pet_store();
    let req = IncomingRequest::new("GET", "/pets/mine?debug=1").with_body(json!({ "x": 1 }));
    let resp = contract.check_request(req).unwrap_err();
    assert_eq!(
        resp.body,
        json!([
            { "property": "requestBody", "error": "unexpected requestBody" },
            { "property": "queryParams", "error": "unexpected queryParams" }
        ])
    );
}

#[test]
fn test_path_and_body_violations_together() {
    let contract = pet_store();
    let req = IncomingRequest::new("PUT", "/owners/al/pets/x").with_body(json!({ "name": "" }));
    let resp = contract.check_request(req).unwrap_err();
    assert_eq!(
        resp.body,
        json!([
            { "property": "requestBody.name", "error": "must be at least 1 character long" },
            { "property": "pathParams.ownerId", "error": "must be at least 3 characters long" },
            { "property": "pathParams.petId", "error": "invalid data type - integer expected" }
        ])
    );
}

#[test]
fn test_optional_body_may_be_omitted() {
    let contract = pet_store();
    let resp = contract.check_request(IncomingRequest::new("PUT", "/owners/ann/pets/1"));
    let violations = resp.unwrap_err().body;
    // Absent optional body is checked as `{}`, so `name` is still required.
    assert_eq!(
        violations,
        json!([{ "property": "requestBody.name", "error": "required field is not present" }])
    );
}

#[test]
fn test_validate_by_key() {
    let contract = pet_store();
    let violations = contract
        .validate(
            "get:/pets",
            &RequestParts::default().with_query_params(json!({ "limit": "0" })),
        )
        .unwrap();
    assert_eq!(
        violations,
        vec![Violation::new("queryParams.limit", "must be greater than or equal to 1")]
    );
    assert!(contract.validate("get:/nope", &RequestParts::default()).is_err());
}

#[test]
fn test_contract_clones_share_state() {
    let contract = pet_store();
    let clone = contract.clone();
    assert_eq!(clone.len(), contract.len());
    assert!(std::ptr::eq(contract.endpoints(), clone.endpoints()));
}
