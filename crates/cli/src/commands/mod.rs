pub mod config;
pub mod doctor;
pub mod products;
pub mod seed;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Runtime;
use vitrina_core::config::{AppConfig, LoadOptions};
use vitrina_store::{CatalogError, JsonFileCatalog};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_catalog_error(command: &str, error: &CatalogError) -> Self {
        let exit_code = match error.class() {
            "catalog_io" | "catalog_malformed" => 4,
            "validation" | "duplicate_code" | "invariant" => 5,
            _ => 6,
        };
        Self::failure(command, error.class(), error.to_string(), exit_code)
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

/// Opens the configured catalog on a fresh runtime and runs `work` against it.
pub(crate) fn with_catalog<T, F, Fut>(command: &str, work: F) -> Result<T, CommandResult>
where
    F: FnOnce(JsonFileCatalog) -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let config = load_config(command)?;
    let runtime = build_runtime(command)?;

    runtime
        .block_on(async {
            let catalog = JsonFileCatalog::open(&config.catalog.path).await;
            work(catalog).await
        })
        .map_err(|error| CommandResult::from_catalog_error(command, &error))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
