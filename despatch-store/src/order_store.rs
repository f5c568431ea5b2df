use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use despatch_order::{Order, OrderRepository, ShipmentStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory order collection.
///
/// Conditional writes hold the collection's write lock across the whole
/// check-then-set, which is what makes the settlement flags safe against
/// a retried delivery call racing with itself.
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
    invoice_seq: AtomicU64,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            invoice_seq: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderStore {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn save_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.write().await;
        let mut incoming = order.clone();
        if let Some(existing) = orders.get(&order.id) {
            // Settlement flags are write-once; a full save never clears a
            // flag another writer already won.
            if existing.inventory_adjusted {
                incoming.inventory_adjusted = true;
                incoming.inventory_adjusted_at = existing.inventory_adjusted_at;
            }
            if existing.agent_commission_pkr.is_some() {
                incoming.agent_commission_pkr = existing.agent_commission_pkr;
                incoming.commission_computed_at = existing.commission_computed_at;
            }
        }
        orders.insert(order.id, incoming);
        Ok(())
    }

    async fn list_orders(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let mut result: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_delivered_by_driver(
        &self,
        driver_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| {
                o.delivery_boy == Some(driver_id)
                    && o.shipment_status == ShipmentStatus::Delivered
                    && from.map_or(true, |f| o.delivered_at.map_or(false, |d| d >= f))
                    && to.map_or(true, |t| o.delivered_at.map_or(false, |d| d <= t))
            })
            .cloned()
            .collect())
    }

    async fn list_delivered_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| {
                o.created_by == creator_id && o.shipment_status == ShipmentStatus::Delivered
            })
            .cloned()
            .collect())
    }

    async fn find_recent_duplicate(
        &self,
        created_by: Uuid,
        phone: &str,
        window_seconds: i64,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let cutoff = Utc::now() - Duration::seconds(window_seconds);
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| {
                o.created_by == created_by && o.phone.0 == phone && o.created_at >= cutoff
            })
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn try_mark_inventory_adjusted(
        &self,
        id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| format!("order {} not found", id))?;
        if order.inventory_adjusted {
            return Ok(false);
        }
        order.inventory_adjusted = true;
        order.inventory_adjusted_at = Some(Utc::now());
        Ok(true)
    }

    async fn try_set_agent_commission(
        &self,
        id: Uuid,
        amount_pkr: f64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| format!("order {} not found", id))?;
        if order.agent_commission_pkr.is_some() {
            return Ok(false);
        }
        order.agent_commission_pkr = Some(amount_pkr);
        order.commission_computed_at = Some(Utc::now());
        Ok(true)
    }

    async fn next_invoice_no(
        &self,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let seq = self.invoice_seq.fetch_add(1, Ordering::SeqCst);
        Ok(format!("INV-{:05}", seq))
    }
}
