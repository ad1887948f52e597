//! # Product Repository
//!
//! Persistence for the product directory: the whole directory is one
//! document under the `products` key and is saved in full after every
//! stock-affecting operation.

use tracing::debug;

use crate::error::StoreResult;
use crate::store::{Store, KEY_PRODUCTS};
use till_core::Product;

/// Repository for the persisted product directory.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: Store) -> Self {
        ProductRepository { store }
    }

    /// Loads all products. An absent document loads as an empty directory.
    pub fn load(&self) -> StoreResult<Vec<Product>> {
        let products: Vec<Product> = self.store.read(KEY_PRODUCTS)?.unwrap_or_default();
        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    /// Replaces the stored directory with `products`.
    pub fn save(&self, products: &[Product]) -> StoreResult<()> {
        debug!(count = products.len(), "Saving products");
        self.store.write(KEY_PRODUCTS, &products)
    }

    /// Loads a single product by id.
    pub fn find(&self, product_id: &str) -> StoreResult<Option<Product>> {
        Ok(self.load()?.into_iter().find(|p| p.id == product_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use till_core::WarehouseStock;

    fn repo() -> (tempfile::TempDir, ProductRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(StoreConfig::new(dir.path())).unwrap();
        (dir, store.products())
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            locations: vec![WarehouseStock {
                warehouse_id: "w1".to_string(),
                stock: 5,
                price_cents: 750,
            }],
        }
    }

    #[test]
    fn test_empty_store_loads_empty_directory() {
        let (_dir, repo) = repo();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, repo) = repo();

        repo.save(&[product("p1"), product("p2")]).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].locations[0].stock, 5);
    }

    #[test]
    fn test_find() {
        let (_dir, repo) = repo();
        repo.save(&[product("p1")]).unwrap();

        assert!(repo.find("p1").unwrap().is_some());
        assert!(repo.find("p9").unwrap().is_none());
    }
}
