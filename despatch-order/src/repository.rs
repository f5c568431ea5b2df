use crate::models::Order;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for order data access.
///
/// The `try_*` methods are atomic conditional writes: the check and the
/// write execute under one storage-level guard, so retried delivery calls
/// racing each other cannot both win a flag.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_orders(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Delivered orders assigned to a driver, optionally date-bounded.
    async fn list_delivered_by_driver(
        &self,
        driver_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Delivered orders created by an agent.
    async fn list_delivered_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Most recent order by the same actor with the same phone inside the
    /// duplicate-submission window, if any.
    async fn find_recent_duplicate(
        &self,
        created_by: Uuid,
        phone: &str,
        window_seconds: i64,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Set `inventory_adjusted` if currently unset. Returns true when this
    /// call won the flag.
    async fn try_mark_inventory_adjusted(
        &self,
        id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Set the commission snapshot if currently absent. Returns true when
    /// this call won the write.
    async fn try_set_agent_commission(
        &self,
        id: Uuid,
        amount_pkr: f64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Next value of the short sequential invoice number.
    async fn next_invoice_no(
        &self,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
