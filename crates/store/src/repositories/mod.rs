use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use vitrina_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use vitrina_core::errors::{ApplicationError, DomainError};

pub mod json_file;
pub mod memory;
mod state;

pub use json_file::JsonFileCatalog;
pub use memory::InMemoryCatalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog file `{path}` could not be accessed: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("catalog file `{path}` is not a valid product list: {source}")]
    Malformed { path: PathBuf, source: serde_json::Error },
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::ProductNotFound { .. }))
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::MissingRequiredFields { .. })
            | Self::Domain(DomainError::EmptyField { .. }) => "validation",
            Self::Domain(DomainError::DuplicateCode { .. }) => "duplicate_code",
            Self::Domain(DomainError::ProductNotFound { .. }) => "not_found",
            Self::Domain(DomainError::InvariantViolation(_)) => "invariant",
            Self::Io { .. } => "catalog_io",
            Self::Malformed { .. } => "catalog_malformed",
        }
    }
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Domain(error) => Self::Domain(error),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Access to the product catalog. Implementations serialize their own
/// read-modify-write sequences; callers may share one instance freely.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// The catalog as currently persisted, in insertion order.
    async fn list(&self) -> Result<Vec<Product>, CatalogError>;

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.list().await?.into_iter().find(|product| product.id == id))
    }

    /// Validates and appends a product, returning the whole updated catalog.
    async fn create(&self, fields: NewProduct) -> Result<Vec<Product>, CatalogError>;

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError>;

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError>;
}
