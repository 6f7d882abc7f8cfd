use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};

use vitrina_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};

use super::state::CatalogState;
use super::{CatalogError, CatalogRepository};

/// Catalog mirrored to a single JSON array file.
///
/// The file is loaded once when the store is opened. Afterwards `list` always
/// re-reads the file, while mutations work against the in-memory copy and
/// rewrite the whole file before the copy is committed.
pub struct JsonFileCatalog {
    path: PathBuf,
    state: Mutex<CatalogState>,
}

impl JsonFileCatalog {
    /// Opens the catalog at `path`. A missing or unreadable file yields an
    /// empty catalog whose identifiers start at 1.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match read_products(&path).await {
            Ok(products) => CatalogState::from_products(products),
            Err(error) => {
                warn!(
                    event_name = "catalog.load.fallback_empty",
                    path = %path.display(),
                    error = %error,
                    "could not load catalog at startup, starting empty"
                );
                CatalogState::default()
            }
        };

        info!(
            event_name = "catalog.load.completed",
            path = %path.display(),
            product_count = state.products().len(),
            next_id = ?state.next_id(),
            "catalog opened"
        );

        Self { path, state: Mutex::new(state) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn next_id(&self) -> Option<ProductId> {
        self.state.lock().await.next_id().map(ProductId)
    }

    async fn persist(&self, products: &[Product]) -> Result<(), CatalogError> {
        let body = serde_json::to_string(products)
            .map_err(|source| CatalogError::Malformed { path: self.path.clone(), source })?;
        write_file(&self.path, &body).await
    }
}

#[async_trait::async_trait]
impl CatalogRepository for JsonFileCatalog {
    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let _state = self.state.lock().await;

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| CatalogError::Io { path: self.path.clone(), source })?;
        if !exists {
            write_file(&self.path, "[]").await?;
        }

        read_products(&self.path).await
    }

    async fn create(&self, fields: NewProduct) -> Result<Vec<Product>, CatalogError> {
        let mut state = self.state.lock().await;
        let (next, product) = state.with_created(fields).map_err(|error| {
            warn!(event_name = "catalog.product.create_rejected", error = %error, "product rejected");
            error
        })?;

        self.persist(next.products()).await?;
        *state = next;

        info!(
            event_name = "catalog.product.created",
            product_id = product.id.0,
            code = %product.code,
            "product created"
        );
        Ok(state.products().to_vec())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let mut state = self.state.lock().await;
        let (next, updated) = state.with_updated(id, &patch)?;

        self.persist(next.products()).await?;
        *state = next;

        info!(event_name = "catalog.product.updated", product_id = id.0, "product updated");
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut state = self.state.lock().await;
        let next = state.without(id)?;

        self.persist(next.products()).await?;
        *state = next;

        info!(event_name = "catalog.product.deleted", product_id = id.0, "product deleted");
        Ok(())
    }
}

async fn read_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::Malformed { path: path.to_path_buf(), source })
}

async fn write_file(path: &Path, body: &str) -> Result<(), CatalogError> {
    match tokio::fs::write(path, body).await {
        Ok(()) => Ok(()),
        Err(source) if source.kind() == ErrorKind::NotFound => {
            // Parent directory is missing; create it once and retry.
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
            }
            tokio::fs::write(path, body)
                .await
                .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })
        }
        Err(source) => Err(CatalogError::Io { path: path.to_path_buf(), source }),
    }
}
