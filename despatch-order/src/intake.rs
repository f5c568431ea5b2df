use crate::models::{Order, OrderItem};
use crate::repository::OrderRepository;
use crate::state_machine::OrderError;
use despatch_core::{Actor, SettlementRules};
use std::sync::Arc;
use uuid::Uuid;

/// Order creation input, straight off the wire.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub items: Vec<OrderItem>,
    pub total: Option<f64>,
    pub discount: f64,
    pub shipping_fee: f64,
    pub cod_amount: f64,
    pub currency: Option<String>,
    pub delivery_boy: Option<Uuid>,
}

pub struct IntakeOutcome {
    pub order: Order,
    /// True when an identical recent submission was returned instead of a
    /// new order being created.
    pub deduplicated: bool,
}

/// Validates and persists new orders, folding duplicate submissions from
/// the same actor inside the configured window back onto the existing order.
pub struct OrderIntake {
    orders: Arc<dyn OrderRepository>,
    rules: SettlementRules,
}

impl OrderIntake {
    pub fn new(orders: Arc<dyn OrderRepository>, rules: SettlementRules) -> Self {
        Self { orders, rules }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateOrderInput,
    ) -> Result<IntakeOutcome, OrderError> {
        if input.phone.trim().is_empty() {
            return Err(OrderError::Validation("phone is required".to_string()));
        }
        if input.address.trim().is_empty() {
            return Err(OrderError::Validation("address is required".to_string()));
        }
        if input.city.trim().is_empty() {
            return Err(OrderError::Validation("city is required".to_string()));
        }
        if input.country.trim().is_empty() {
            return Err(OrderError::Validation("country is required".to_string()));
        }
        let (latitude, longitude) = match (input.latitude, input.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(OrderError::Validation(
                    "precise geolocation (latitude, longitude) is required".to_string(),
                ))
            }
        };

        // Double-submit protection: same actor, same phone, inside the
        // window -> hand back the existing order instead of forking a copy.
        if let Some(existing) = self
            .orders
            .find_recent_duplicate(actor.id, &input.phone, self.rules.duplicate_window_seconds)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?
        {
            tracing::info!(
                order_id = %existing.id,
                invoice_no = %existing.invoice_no,
                "duplicate submission folded onto existing order"
            );
            return Ok(IntakeOutcome {
                order: existing,
                deduplicated: true,
            });
        }

        let invoice_no = self
            .orders
            .next_invoice_no()
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;

        let mut order = Order::new(
            invoice_no,
            input.phone,
            input.address,
            input.city,
            input.country,
            latitude,
            longitude,
            actor.id,
            actor.role,
            actor.owner_id,
            input.currency.unwrap_or_else(|| "AED".to_string()),
        );
        for item in input.items {
            order.add_item(item);
        }
        if let Some(total) = input.total {
            order.total = total;
        }
        order.discount = input.discount;
        order.shipping_fee = input.shipping_fee;
        order.cod_amount = input.cod_amount;
        order.delivery_boy = input.delivery_boy;
        if order.delivery_boy.is_some() {
            order.shipment_status = crate::models::ShipmentStatus::Assigned;
        }
        order.recompute_balance_due();

        self.orders
            .create_order(&order)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;

        Ok(IntakeOutcome {
            order,
            deduplicated: false,
        })
    }
}
