use crate::repository::ProductRepository;
use std::sync::Arc;
use uuid::Uuid;

/// One delivered line item, as the order side reports it.
#[derive(Debug, Clone)]
pub struct DeliveredItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Decrements per-country stock when an order is fulfilled.
///
/// The idempotency guard lives on the order (`inventory_adjusted`); callers
/// must win that flag before invoking the ledger, so this type only applies
/// the arithmetic.
pub struct InventoryLedger {
    products: Arc<dyn ProductRepository>,
}

impl InventoryLedger {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Decrement each item's destination-country bucket, clamped at zero.
    /// Unknown products are skipped with a warning; the delivery itself
    /// already happened and must not be rolled back over a stale catalog.
    pub async fn adjust_for_delivery(
        &self,
        items: &[DeliveredItem],
        country: &str,
    ) -> Result<(), InventoryError> {
        for item in items {
            let product = self
                .products
                .get_product(item.product_id)
                .await
                .map_err(|e| InventoryError::Storage(e.to_string()))?;

            let mut product = match product {
                Some(p) => p,
                None => {
                    tracing::warn!(
                        product_id = %item.product_id,
                        "skipping stock decrement for unknown product"
                    );
                    continue;
                }
            };

            let removed = product.decrement_country_stock(country, item.quantity);
            if removed < item.quantity {
                tracing::warn!(
                    product_id = %item.product_id,
                    requested = item.quantity,
                    removed,
                    "stock bucket exhausted, decrement clamped at zero"
                );
            }

            self.products
                .save_product(&product)
                .await
                .map_err(|e| InventoryError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory storage failure: {0}")]
    Storage(String),
}
