use vitrina_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use vitrina_core::errors::DomainError;

/// Owned catalog contents plus the identifier counter. Every mutation is
/// computed against a copy and only committed once the caller has persisted it.
///
/// `next_id` is `None` once the highest stored identifier is `u64::MAX`.
#[derive(Clone, Debug)]
pub(crate) struct CatalogState {
    products: Vec<Product>,
    next_id: Option<u64>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self { products: Vec::new(), next_id: Some(1) }
    }
}

impl CatalogState {
    pub(crate) fn from_products(products: Vec<Product>) -> Self {
        let next_id = match products.iter().map(|product| product.id.0).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(1),
        };
        Self { products, next_id }
    }

    pub(crate) fn products(&self) -> &[Product] {
        &self.products
    }

    pub(crate) fn next_id(&self) -> Option<u64> {
        self.next_id
    }

    pub(crate) fn with_created(&self, fields: NewProduct) -> Result<(Self, Product), DomainError> {
        let id = self.next_id.ok_or_else(|| {
            DomainError::InvariantViolation("product identifiers are exhausted".to_owned())
        })?;
        let product = fields.into_product(ProductId(id))?;

        if self.products.iter().any(|existing| existing.code == product.code) {
            return Err(DomainError::DuplicateCode { code: product.code });
        }

        let mut next = self.clone();
        next.products.push(product.clone());
        next.next_id = id.checked_add(1);
        Ok((next, product))
    }

    pub(crate) fn with_updated(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<(Self, Product), DomainError> {
        let current = self
            .products
            .iter()
            .find(|product| product.id == id)
            .ok_or(DomainError::ProductNotFound { id })?;

        let updated = patch.apply(current)?;

        let collides = self
            .products
            .iter()
            .any(|other| other.id != id && other.code == updated.code);
        if collides {
            return Err(DomainError::DuplicateCode { code: updated.code });
        }

        let mut next = self.clone();
        for product in &mut next.products {
            if product.id == id {
                *product = updated.clone();
            }
        }
        Ok((next, updated))
    }

    pub(crate) fn without(&self, id: ProductId) -> Result<Self, DomainError> {
        let remaining: Vec<Product> =
            self.products.iter().filter(|product| product.id != id).cloned().collect();

        if remaining.len() == self.products.len() {
            return Err(DomainError::ProductNotFound { id });
        }

        Ok(Self { products: remaining, next_id: self.next_id })
    }
}
