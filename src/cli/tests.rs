//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands, Outcome};
use crate::runtime_config::RuntimeConfig;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const SPEC: &str = r#"
paths:
  /pets:
    get:
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            maximum: 100
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
  /pets/{petId}:
    get:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
components:
  schemas:
    NewPet:
      type: object
      required: [name]
      properties:
        name:
          type: string
          minLength: 1
"#;

fn spec_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(SPEC.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> (Outcome, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let outcome = execute(&cli, &RuntimeConfig::default(), &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn test_validate_command_parses() {
    let cli = Cli::try_parse_from([
        "apicontract",
        "validate",
        "--spec",
        "api.yaml",
        "--method",
        "POST",
        "--path",
        "/pets",
        "--body",
        "{}",
    ])
    .unwrap();

    match cli.command {
        Commands::Validate {
            spec, method, path, query, body,
        } => {
            assert_eq!(spec.to_string_lossy(), "api.yaml");
            assert_eq!(method, "POST");
            assert_eq!(path, "/pets");
            assert!(query.is_none());
            assert_eq!(body.as_deref(), Some("{}"));
        }
        _ => panic!("Expected Validate command"),
    }
    assert!(!cli.no_dereference);
}

#[test]
fn test_global_no_dereference_flag() {
    let cli = Cli::try_parse_from(["apicontract", "check", "--spec", "a.json", "--no-dereference"])
        .unwrap();
    assert!(cli.no_dereference);
}

#[test]
fn test_route_requires_method() {
    assert!(Cli::try_parse_from(["apicontract", "route", "--spec", "a.yaml", "--path", "/"]).is_err());
}

#[test]
fn test_check_reports_endpoint_count() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();
    let (outcome, out) = run(&["apicontract", "check", "--spec", path]);
    assert_eq!(outcome, Outcome::Success);
    assert!(out.contains("3 endpoint(s) compiled"), "{out}");
}

#[test]
fn test_routes_lists_keys_in_order() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();
    let (_, out) = run(&["apicontract", "routes", "--spec", path]);
    let keys: Vec<&str> = out.lines().collect();
    assert_eq!(keys, vec!["get:/pets", "post:/pets", "get:/pets/{petId}"]);
}

#[test]
fn test_schema_for_one_endpoint() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();
    let (_, out) = run(&["apicontract", "schema", "--spec", path, "--endpoint", "post:/pets"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["requestBodyRequired"], true);
    assert_eq!(value["requestBodySchema"]["required"][0], "name");
}

#[test]
fn test_route_hit_and_miss() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();

    let (outcome, out) = run(&["apicontract", "route", "--spec", path, "-m", "GET", "-p", "/pets/7"]);
    assert_eq!(outcome, Outcome::Success);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["endpoint"], "get:/pets/{petId}");
    assert_eq!(value["pathParams"]["petId"], "7");

    let (outcome, out) = run(&["apicontract", "route", "--spec", path, "-m", "GET", "-p", "/cats"]);
    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(out.trim(), "not found");
}

#[test]
fn test_validate_reports_violations() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();

    let (outcome, out) = run(&[
        "apicontract", "validate", "--spec", path, "-m", "POST", "-p", "/pets", "-b", r#"{"name": ""}"#,
    ]);
    assert_eq!(outcome, Outcome::Rejected);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["status"], 400);
    assert_eq!(value["body"][0]["property"], "requestBody.name");

    let (outcome, _) = run(&[
        "apicontract", "validate", "--spec", path, "-m", "GET", "-p", "/pets?limit=5",
    ]);
    assert_eq!(outcome, Outcome::Success);
}

#[test]
fn test_invalid_body_json_is_an_error() {
    let file = spec_file();
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from([
        "apicontract", "validate", "--spec", path, "-m", "POST", "-p", "/pets", "-b", "{nope",
    ])
    .unwrap();
    let mut out = Vec::new();
    let err = execute(&cli, &RuntimeConfig::default(), &mut out).unwrap_err();
    assert!(err.to_string().contains("--body is not valid JSON"));
}
