use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use vitrina_cli::commands::{doctor, products, seed};
use vitrina_core::domain::product::{NewProduct, ProductPatch};

fn product(code: &str) -> NewProduct {
    NewProduct {
        title: Some("A".to_string()),
        description: Some("d".to_string()),
        price: Some(Decimal::new(10, 0)),
        thumbnail: Some("t".to_string()),
        code: Some(code.to_string()),
        stock: Some(5),
    }
}

#[test]
fn add_then_list_reports_created_product() {
    with_catalog(|_| {
        let result = products::add(product("c1"));
        assert_eq!(result.exit_code, 0, "expected successful add");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "add");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["id"], 1);

        let listed = parse_payload(&products::list(None).output);
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    });
}

#[test]
fn duplicate_code_is_rejected_with_validation_exit_code() {
    with_catalog(|_| {
        assert_eq!(products::add(product("c1")).exit_code, 0);

        let result = products::add(product("c1"));
        assert_eq!(result.exit_code, 5, "expected duplicate code failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "duplicate_code");

        let listed = parse_payload(&products::list(None).output);
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    });
}

#[test]
fn missing_fields_are_reported() {
    with_catalog(|_| {
        let result = products::add(NewProduct { thumbnail: None, ..product("c1") });
        assert_eq!(result.exit_code, 5);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("thumbnail"));
    });
}

#[test]
fn update_is_visible_after_reopening_catalog() {
    with_catalog(|path| {
        assert_eq!(products::add(product("c1")).exit_code, 0);

        let result = products::update(
            1,
            ProductPatch { title: Some("Producto Actualizado".to_string()), ..ProductPatch::default() },
        );
        assert_eq!(result.exit_code, 0, "expected successful update");

        let raw = std::fs::read_to_string(path).expect("catalog file");
        assert!(raw.contains("Producto Actualizado"));

        let fetched = parse_payload(&products::get(1).output);
        assert_eq!(fetched["data"]["title"], "Producto Actualizado");
    });
}

#[test]
fn empty_update_is_rejected_without_touching_catalog() {
    with_catalog(|_| {
        let result = products::update(1, ProductPatch::default());
        assert_eq!(result.exit_code, 5);
        assert_eq!(parse_payload(&result.output)["error_class"], "validation");
    });
}

#[test]
fn delete_missing_product_reports_not_found() {
    with_catalog(|_| {
        assert_eq!(products::add(product("c1")).exit_code, 0);

        let result = products::delete(7);
        assert_eq!(result.exit_code, 6);
        assert_eq!(parse_payload(&result.output)["error_class"], "not_found");

        let deleted = products::delete(1);
        assert_eq!(deleted.exit_code, 0);
        let listed = parse_payload(&products::list(None).output);
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn get_missing_product_reports_not_found() {
    with_catalog(|_| {
        let result = products::get(1);
        assert_eq!(result.exit_code, 6);
        assert_eq!(parse_payload(&result.output)["error_class"], "not_found");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_catalog(|_| {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert!(first_payload["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("demo catalog seeded: 10 created, 0 already present"));

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert!(second_payload["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("demo catalog seeded: 0 created, 10 already present, 10 products"));

        let limited = parse_payload(&products::list(Some(2)).output);
        let codes: Vec<&str> = limited["data"]
            .as_array()
            .map(|items| items.iter().filter_map(|item| item["code"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(codes, vec!["abc123", "def456"]);
    });
}

#[test]
fn invalid_config_fails_with_config_exit_code() {
    with_catalog(|_| {
        env::set_var("VITRINA_LOGGING_LEVEL", "loud");
        let result = products::list(None);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn doctor_reports_pass_for_readable_catalog() {
    with_catalog(|_| {
        let report: Value = serde_json::from_str(&doctor::run(true)).expect("doctor json");
        assert_eq!(report["overall_status"], "pass");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

/// Runs `test_fn` with a fresh catalog file configured through the environment.
fn with_catalog(test_fn: impl FnOnce(&Path)) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "VITRINA_CATALOG_PATH",
        "VITRINA_SERVER_BIND_ADDRESS",
        "VITRINA_SERVER_PORT",
        "VITRINA_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "VITRINA_LOGGING_LEVEL",
        "VITRINA_LOGGING_FORMAT",
        "VITRINA_LOG_LEVEL",
        "VITRINA_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }

    let dir = TempDir::new().expect("tempdir");
    let catalog_path = dir.path().join("products.json");
    env::set_var("VITRINA_CATALOG_PATH", &catalog_path);

    test_fn(&catalog_path);

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
