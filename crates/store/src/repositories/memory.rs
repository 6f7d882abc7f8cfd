use tokio::sync::RwLock;

use vitrina_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};

use super::state::CatalogState;
use super::{CatalogError, CatalogRepository};

#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { state: RwLock::new(CatalogState::from_products(products)) }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let state = self.state.read().await;
        Ok(state.products().to_vec())
    }

    async fn create(&self, fields: NewProduct) -> Result<Vec<Product>, CatalogError> {
        let mut state = self.state.write().await;
        let (next, _) = state.with_created(fields)?;
        *state = next;
        Ok(state.products().to_vec())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let mut state = self.state.write().await;
        let (next, updated) = state.with_updated(id, &patch)?;
        *state = next;
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut state = self.state.write().await;
        *state = state.without(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use vitrina_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};

    use crate::repositories::{CatalogRepository, InMemoryCatalog};

    fn product(id: u64, code: &str) -> Product {
        Product {
            id: ProductId(id),
            title: format!("producto {id}"),
            description: "descripcion".to_string(),
            price: Decimal::new(200, 0),
            thumbnail: "Sin imagen".to_string(),
            code: code.to_string(),
            stock: 25,
        }
    }

    #[tokio::test]
    async fn in_memory_catalog_round_trip() {
        let repo = InMemoryCatalog::default();
        let products = repo
            .create(NewProduct {
                title: Some("A".to_string()),
                description: Some("d".to_string()),
                price: Some(Decimal::new(10, 0)),
                thumbnail: Some("t".to_string()),
                code: Some("c1".to_string()),
                stock: Some(5),
            })
            .await
            .expect("create product");

        let found = repo.get_by_id(ProductId(1)).await.expect("find product");

        assert_eq!(found.as_ref(), products.first());
    }

    #[tokio::test]
    async fn preloaded_catalog_keeps_order_and_counter() {
        let repo = InMemoryCatalog::with_products(vec![product(5, "e"), product(2, "b")]);

        let ids: Vec<u64> =
            repo.list().await.expect("list").iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![5, 2]);

        let updated = repo
            .update(ProductId(2), ProductPatch { stock: Some(1), ..ProductPatch::default() })
            .await
            .expect("update");
        assert_eq!(updated.stock, 1);

        repo.delete(ProductId(5)).await.expect("delete");
        assert!(repo.delete(ProductId(5)).await.is_err());
    }
}
