use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::info;
use vitrina_core::config::{AppConfig, ConfigError, LoadOptions};
use vitrina_store::{CatalogRepository, JsonFileCatalog};

use crate::{catalog, health};

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<dyn CatalogRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not bind `{address}`: {source}")]
    Bind { address: String, source: std::io::Error },
}

impl Application {
    pub fn router(&self) -> Router {
        catalog::router(catalog::CatalogState::new(self.catalog.clone()))
            .merge(health::router(self.catalog.clone()))
    }
}

/// Runs before logging is initialized, so it only reports through its result.
pub fn load_config(options: LoadOptions) -> Result<AppConfig, BootstrapError> {
    Ok(AppConfig::load(options)?)
}

pub async fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let catalog = JsonFileCatalog::open(&config.catalog.path).await;
    info!(
        event_name = "system.bootstrap.catalog_opened",
        correlation_id = "bootstrap",
        path = %config.catalog.path.display(),
        "catalog store ready"
    );

    Application { config, catalog: Arc::new(catalog) }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use vitrina_core::config::{ConfigOverrides, LoadOptions};
    use vitrina_core::domain::product::NewProduct;

    use crate::bootstrap::{bootstrap_with_config, load_config};

    fn options(catalog_path: PathBuf) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                catalog_path: Some(catalog_path),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_config() {
        let result = load_config(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("chatty".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        assert!(message.contains("logging.level"));
    }

    #[tokio::test]
    async fn integration_smoke_covers_startup_store_and_routes() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_config(options(dir.path().join("products.json")))
            .expect("config should load with valid overrides");
        let app = bootstrap_with_config(config).await;

        for code in ["c1", "c2", "c3", "c4", "c5"] {
            app.catalog
                .create(NewProduct {
                    title: Some(format!("producto {code}")),
                    description: Some("d".to_string()),
                    price: Some(Decimal::new(10, 0)),
                    thumbnail: Some("t".to_string()),
                    code: Some(code.to_string()),
                    stock: Some(5),
                })
                .await
                .expect("create product");
        }

        let response = app
            .router()
            .oneshot(Request::builder().uri("/products?limit=2").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        let codes: Vec<&str> = payload["productos"]
            .as_array()
            .map(|items| items.iter().filter_map(|item| item["code"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(codes, vec!["c1", "c2"]);

        let health = app
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);

        let missing = app
            .router()
            .oneshot(Request::builder().uri("/products/42").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
