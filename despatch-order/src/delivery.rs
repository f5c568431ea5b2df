use crate::commission::CommissionCalculator;
use crate::models::{Order, ShipmentStatus};
use crate::repository::OrderRepository;
use crate::state_machine::{OrderError, OrderStateMachine};
use async_trait::async_trait;
use chrono::Utc;
use despatch_catalog::inventory::{DeliveredItem, InventoryLedger};
use despatch_core::Actor;
use std::sync::Arc;

/// Fire-and-forget side effect invoked after the primary state write has
/// committed. Hook failures are logged and swallowed; they never propagate
/// into the transition's result.
#[async_trait]
pub trait PostCommitHook: Send + Sync {
    async fn on_delivered(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Drives shipment transitions and the settlement side effects of the
/// delivered transition: collected-amount resolution, commission snapshot,
/// inventory decrement, post-commit notifications.
pub struct DeliveryService {
    orders: Arc<dyn OrderRepository>,
    inventory: InventoryLedger,
    calculator: CommissionCalculator,
    hooks: Vec<Arc<dyn PostCommitHook>>,
}

impl DeliveryService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        inventory: InventoryLedger,
        calculator: CommissionCalculator,
        hooks: Vec<Arc<dyn PostCommitHook>>,
    ) -> Self {
        Self {
            orders,
            inventory,
            calculator,
            hooks,
        }
    }

    /// Apply a shipment transition on behalf of `actor`.
    ///
    /// `collected` is only meaningful for the first delivered transition:
    /// an explicit value wins; otherwise, when the stored value is still
    /// zero, it falls back to the COD amount, then the order total. Once
    /// the order is delivered the collected amount is frozen; a retried
    /// delivered call never rewrites it, explicit input included.
    pub async fn transition(
        &self,
        actor: &Actor,
        order_id: uuid::Uuid,
        target: ShipmentStatus,
        collected: Option<f64>,
    ) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .get_order(order_id)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        OrderStateMachine::authorize(actor, &order, target)?;
        let was_delivered = order.shipment_status == ShipmentStatus::Delivered;
        OrderStateMachine::apply(&mut order, target)?;

        if target == ShipmentStatus::Delivered {
            self.settle_delivery(&mut order, collected, was_delivered)
                .await?;
        } else {
            self.orders
                .save_order(&order)
                .await
                .map_err(|e| OrderError::Storage(e.to_string()))?;
        }

        Ok(order)
    }

    async fn settle_delivery(
        &self,
        order: &mut Order,
        collected: Option<f64>,
        already_delivered: bool,
    ) -> Result<(), OrderError> {
        // 1. Resolve collected amount, but only on the first delivery.
        //    A retried delivered call leaves the settled figures alone,
        //    even when it carries an explicit amount.
        if !already_delivered {
            if let Some(amount) = collected {
                order.collected_amount = amount;
            } else if order.collected_amount == 0.0 {
                order.collected_amount = if order.cod_amount > 0.0 {
                    order.cod_amount
                } else {
                    order.effective_total()
                };
            }

            // 2. Balance follows every mutation of its inputs.
            order.recompute_balance_due();
        }

        self.orders
            .save_order(order)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;

        // 3. Commission snapshot, set-if-absent at the storage boundary.
        if order.agent_commission_pkr.is_none() {
            let commission = self.calculator.commission_pkr(order);
            let won = self
                .orders
                .try_set_agent_commission(order.id, commission)
                .await
                .map_err(|e| OrderError::Storage(e.to_string()))?;
            if won {
                order.agent_commission_pkr = Some(commission);
                order.commission_computed_at = Some(Utc::now());
            }
        }

        // 4. Inventory decrement, guarded by the inventory_adjusted flag.
        let adjust = self
            .orders
            .try_mark_inventory_adjusted(order.id)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;
        if adjust {
            order.inventory_adjusted = true;
            order.inventory_adjusted_at = Some(Utc::now());
            let items: Vec<DeliveredItem> = order
                .items
                .iter()
                .map(|i| DeliveredItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect();
            if let Err(e) = self.inventory.adjust_for_delivery(&items, &order.country).await {
                // The transition already committed; stock drift is repaired
                // by reconciliation, not by failing the delivery.
                tracing::error!(order_id = %order.id, error = %e, "inventory adjustment failed");
            }
        }

        // Pick up whatever the conditional writes left behind, so the
        // returned order and the hooks see the stored state.
        if let Some(stored) = self
            .orders
            .get_order(order.id)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?
        {
            *order = stored;
        }

        // 5. Post-commit hooks, each in its own failure boundary.
        for hook in &self.hooks {
            if let Err(e) = hook.on_delivered(order).await {
                tracing::warn!(order_id = %order.id, error = %e, "post-commit hook failed");
            }
        }

        Ok(())
    }

    /// Corrective edit of non-financial metadata. Allowed even in terminal
    /// states; settlement fields stay frozen.
    pub async fn update_metadata(
        &self,
        actor: &Actor,
        order_id: uuid::Uuid,
        address: Option<String>,
        city: Option<String>,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .get_order(order_id)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        let allowed = (actor.role.is_staff() && order.owner_id == actor.owner_id)
            || order.created_by == actor.id;
        if !allowed {
            return Err(OrderError::Forbidden(format!(
                "actor may not edit order {}",
                order.invoice_no
            )));
        }

        if let Some(address) = address {
            order.address = address;
        }
        if let Some(city) = city {
            order.city = city;
        }
        if let Some(notes) = notes {
            order.notes = Some(notes);
        }
        order.touch();

        self.orders
            .save_order(&order)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;
        Ok(order)
    }
}
