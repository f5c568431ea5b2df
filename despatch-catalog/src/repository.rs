use crate::product::Product;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for product data access. The catalog's own CRUD lives
/// outside the core; delivery settlement only needs lookup and stock save.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_product(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
