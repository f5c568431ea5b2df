use async_trait::async_trait;
use despatch_catalog::{Product, ProductRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory product collection. Catalog CRUD lives outside the core, so
/// this store only exists for lookups and delivered-stock saves.
pub struct MemoryProductStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }

    pub async fn seed(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductStore {
    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn save_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }
}
