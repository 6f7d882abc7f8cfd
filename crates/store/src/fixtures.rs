use rust_decimal::Decimal;
use tracing::info;

use vitrina_core::domain::product::NewProduct;
use vitrina_core::errors::DomainError;

use crate::repositories::{CatalogError, CatalogRepository};

/// Demo products: (title, description, price, code, stock).
const SEED_PRODUCTS: &[(&str, &str, i64, &str, u64)] = &[
    ("producto prueba", "Este es un producto prueba", 200, "abc123", 25),
    ("producto prueba 2", "Este es otro producto prueba", 500, "def456", 10),
    ("producto prueba 3", "Este es el tercer producto prueba", 400, "xyz321", 45),
    ("producto prueba 4", "Este es el cuarto producto prueba", 450, "xyz123", 55),
    ("producto prueba 5", "Este es el quinto producto prueba", 25, "src555", 752),
    ("producto prueba 6", "Este es el sexto producto prueba", 1200, "njs999", 8),
    ("producto prueba 7", "Este es el séptimo producto prueba", 50, "epx123", 155),
    ("producto prueba 8", "Este es el octavo producto prueba", 300, "qwe432", 99),
    ("producto prueba 9", "Este es el noveno producto prueba", 200, "zxy456", 15),
    ("producto prueba 10", "Este es el decimo producto prueba", 850, "xyz789", 85),
];

const SEED_THUMBNAIL: &str = "Sin imagen";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub catalog_size: usize,
}

pub struct SeedDataset;

impl SeedDataset {
    pub fn products() -> Vec<NewProduct> {
        SEED_PRODUCTS
            .iter()
            .map(|(title, description, price, code, stock)| NewProduct {
                title: Some((*title).to_string()),
                description: Some((*description).to_string()),
                price: Some(Decimal::new(*price, 0)),
                thumbnail: Some(SEED_THUMBNAIL.to_string()),
                code: Some((*code).to_string()),
                stock: Some(*stock),
            })
            .collect()
    }

    /// Creates every demo product whose code is not in the catalog yet.
    pub async fn load(repository: &dyn CatalogRepository) -> Result<SeedResult, CatalogError> {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for product in Self::products() {
            let code = product.code.clone().unwrap_or_default();
            match repository.create(product).await {
                Ok(_) => created.push(code),
                Err(CatalogError::Domain(DomainError::DuplicateCode { .. })) => skipped.push(code),
                Err(error) => return Err(error),
            }
        }

        let catalog_size = repository.list().await?.len();
        info!(
            event_name = "catalog.seed.completed",
            created = created.len(),
            skipped = skipped.len(),
            catalog_size,
            "seed dataset loaded"
        );

        Ok(SeedResult { created, skipped, catalog_size })
    }
}
