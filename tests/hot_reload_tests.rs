#![allow(clippy::unwrap_used, clippy::expect_used)]

use apicontract::hot_reload::{from_config, reload, shared, watch_spec};
use apicontract::runtime_config::RuntimeConfig;
use apicontract::ApiContract;
use std::time::{Duration, Instant};

mod common;
use common::temp_files;

const SPEC_V1: &str = r#"
paths:
  /foo:
    get: {}
"#;

const SPEC_V2: &str = r#"
paths:
  /foo:
    get: {}
  /bar/{id}:
    get:
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer } }
"#;

const SPEC_BROKEN: &str = r#"
paths:
  /bar/{id}:
    get: {}
"#;

#[test]
fn test_reload_swaps_whole_contract() {
    let file = temp_files::create_temp_yaml(SPEC_V1);
    let contract = shared(ApiContract::load(file.path(), true).unwrap());
    let before = contract.load_full();
    assert!(before.route("GET", "/bar/1").is_err());

    std::fs::write(file.path(), SPEC_V2).unwrap();
    assert_eq!(reload(&contract, file.path(), true).unwrap(), 2);

    let after = contract.load();
    assert_eq!(&*after.route("GET", "/bar/1").unwrap().endpoint_key, "get:/bar/{id}");
    // A snapshot taken before the swap is unaffected.
    assert_eq!(before.len(), 1);
}

#[test]
fn test_failed_reload_keeps_previous_contract() {
    let file = temp_files::create_temp_yaml(SPEC_V1);
    let contract = shared(ApiContract::load(file.path(), true).unwrap());

    std::fs::write(file.path(), SPEC_BROKEN).unwrap();
    let err = reload(&contract, file.path(), true).unwrap_err();
    assert!(err.to_string().contains("spec compilation failed"), "{err}");

    let current = contract.load();
    assert_eq!(current.len(), 1);
    assert!(current.route("GET", "/foo").is_ok());
}

#[test]
fn test_from_config_without_hot_reload() {
    let file = temp_files::create_temp_yaml(SPEC_V1);
    let config = RuntimeConfig {
        spec_path: Some(file.path().to_path_buf()),
        hot_reload: false,
        dereference: true,
    };
    let (contract, watcher) = from_config(&config).unwrap();
    assert!(watcher.is_none());
    assert_eq!(contract.load().len(), 1);

    let err = from_config(&RuntimeConfig::default()).unwrap_err();
    assert!(err.to_string().contains("APICONTRACT_SPEC"));
}

#[test]
fn test_watch_spec_reload() {
    let file = temp_files::create_temp_yaml(SPEC_V1);
    let contract = shared(ApiContract::load(file.path(), true).unwrap());
    let watcher = watch_spec(file.path(), contract.clone(), true).unwrap();

    std::thread::sleep(Duration::from_millis(100));
    std::fs::write(file.path(), SPEC_V2).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while contract.load().len() != 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    assert_eq!(contract.load().len(), 2);
    drop(watcher);
}
