use chrono::{DateTime, Utc};
use despatch_core::Role;
use despatch_shared::pii::MaskedPhone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse order status. The fine-grained lifecycle lives in
/// [`ShipmentStatus`]; this field only answers "has it left the warehouse".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Shipped,
}

/// Fine-grained shipment lifecycle.
///
/// `pending → assigned → picked_up → in_transit/shipped →
/// {delivered | returned | cancelled}`, with driver progress markers
/// (`no_response`, `attempted`, `contacted`) along the way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    Assigned,
    NoResponse,
    Attempted,
    Contacted,
    PickedUp,
    InTransit,
    Shipped,
    OutForDelivery,
    Delivered,
    Returned,
    Cancelled,
}

impl ShipmentStatus {
    /// Terminal-by-business-intent states. Settlement fields freeze here;
    /// only corrective edits of non-financial metadata remain possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ShipmentStatus::Delivered | ShipmentStatus::Returned | ShipmentStatus::Cancelled
        )
    }

    /// The subset a driver may apply to an order assigned to them.
    pub fn driver_allowed(&self) -> bool {
        matches!(
            self,
            ShipmentStatus::NoResponse
                | ShipmentStatus::Attempted
                | ShipmentStatus::Contacted
                | ShipmentStatus::PickedUp
                | ShipmentStatus::Delivered
                | ShipmentStatus::Returned
        )
    }
}

/// An individual product line within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// The unit of fulfillment. Created by staff or the API, mutated through
/// the state machine, never deleted (terminal states are retained for audit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Short sequential invoice number, unique per deployment.
    pub invoice_no: String,

    // Customer / destination
    pub phone: MaskedPhone,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub notes: Option<String>,

    // Commercial
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub discount: f64,
    pub shipping_fee: f64,
    pub cod_amount: f64,
    pub collected_amount: f64,
    /// Derived: `max(0, cod_amount - collected_amount - shipping_fee)`.
    pub balance_due: f64,
    pub currency: String,

    // Lifecycle
    pub status: OrderStatus,
    pub shipment_status: ShipmentStatus,
    pub shipped_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub out_for_delivery_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,

    // Ownership
    pub created_by: Uuid,
    pub created_by_role: Role,
    pub owner_id: Uuid,
    pub delivery_boy: Option<Uuid>,

    // Settlement flags. Each written at most once, on the first transition
    // into delivered, via conditional writes at the storage boundary.
    pub inventory_adjusted: bool,
    pub inventory_adjusted_at: Option<DateTime<Utc>>,
    pub agent_commission_pkr: Option<f64>,
    pub commission_computed_at: Option<DateTime<Utc>>,
    pub settled: bool,
    pub received_from_courier: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invoice_no: String,
        phone: String,
        address: String,
        city: String,
        country: String,
        latitude: f64,
        longitude: f64,
        created_by: Uuid,
        created_by_role: Role,
        owner_id: Uuid,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            invoice_no,
            phone: MaskedPhone(phone),
            address,
            city,
            country,
            latitude,
            longitude,
            notes: None,
            items: Vec::new(),
            total: 0.0,
            discount: 0.0,
            shipping_fee: 0.0,
            cod_amount: 0.0,
            collected_amount: 0.0,
            balance_due: 0.0,
            currency,
            status: OrderStatus::Pending,
            shipment_status: ShipmentStatus::Pending,
            shipped_at: None,
            picked_up_at: None,
            out_for_delivery_at: None,
            delivered_at: None,
            created_by,
            created_by_role,
            owner_id,
            delivery_boy: None,
            inventory_adjusted: false,
            inventory_adjusted_at: None,
            agent_commission_pkr: None,
            commission_computed_at: None,
            settled: false,
            received_from_courier: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_item(&mut self, item: OrderItem) {
        self.total += item.line_total();
        self.items.push(item);
        self.touch();
    }

    /// Sum of line totals, used when `total` was never set explicitly.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    /// The monetary value the rest of the engine works from.
    pub fn effective_total(&self) -> f64 {
        if self.total > 0.0 {
            self.total
        } else {
            self.items_total()
        }
    }

    /// Invariant: holds immediately after every mutation touching any input.
    pub fn recompute_balance_due(&mut self) {
        self.balance_due = (self.cod_amount - self.collected_amount - self.shipping_fee).max(0.0);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
