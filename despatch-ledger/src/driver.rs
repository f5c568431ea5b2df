use crate::models::{RemitMethod, Remittance, RemittanceStatus, WalletSummary};
use crate::repository::{PendingInsert, RemittanceRepository};
use crate::LedgerError;
use chrono::{DateTime, Utc};
use despatch_core::{Actor, Role, UserDirectory};
use despatch_order::{Order, OrderRepository};
use std::sync::Arc;
use uuid::Uuid;

/// The cash value a delivered order contributes to the driver's gross:
/// collected amount, falling back to the order total, then line items.
pub fn driver_order_value(order: &Order) -> f64 {
    if order.collected_amount > 0.0 {
        order.collected_amount
    } else {
        order.effective_total()
    }
}

#[derive(Debug, Clone)]
pub struct SubmitRemittance {
    pub manager_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub method: RemitMethod,
    pub proof_ref: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Driver-to-company ledger: gross collected cash netted against accepted
/// remittances. Balances are recomputed on every read, never cached.
pub struct DriverLedger {
    orders: Arc<dyn OrderRepository>,
    remittances: Arc<dyn RemittanceRepository>,
    users: Arc<dyn UserDirectory>,
}

impl DriverLedger {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        remittances: Arc<dyn RemittanceRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            orders,
            remittances,
            users,
        }
    }

    /// Gross collected cash across the driver's delivered orders,
    /// optionally bounded by a delivery-date range.
    pub async fn gross_collected(
        &self,
        driver_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(f64, u64), LedgerError> {
        let delivered = self
            .orders
            .list_delivered_by_driver(driver_id, from, to)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        let gross = delivered.iter().map(driver_order_value).sum();
        Ok((gross, delivered.len() as u64))
    }

    pub async fn wallet(&self, driver_id: Uuid) -> Result<WalletSummary, LedgerError> {
        let (gross, delivered_orders) = self.gross_collected(driver_id, None, None).await?;
        let settled = self
            .remittances
            .sum_accepted_for_driver(driver_id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(WalletSummary {
            gross,
            settled,
            available: (gross - settled).max(0.0),
            delivered_orders,
        })
    }

    /// Submit a new remittance request on behalf of a driver.
    pub async fn submit(
        &self,
        actor: &Actor,
        input: SubmitRemittance,
    ) -> Result<Remittance, LedgerError> {
        if actor.role != Role::Driver {
            return Err(LedgerError::Forbidden(
                "only drivers submit remittances".to_string(),
            ));
        }
        if input.amount <= 0.0 {
            return Err(LedgerError::Validation(
                "amount must be positive".to_string(),
            ));
        }
        if input.method == RemitMethod::Transfer && input.proof_ref.is_none() {
            return Err(LedgerError::Validation(
                "proof of transfer is required for the transfer method".to_string(),
            ));
        }

        let manager = self
            .users
            .find_user(input.manager_id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or_else(|| LedgerError::NotFound(format!("manager {}", input.manager_id)))?;

        if manager.owner_id != actor.owner_id {
            return Err(LedgerError::Validation(
                "manager belongs to a different workspace".to_string(),
            ));
        }
        if let (Some(dc), Some(mc)) = (&actor.country, &manager.country) {
            if dc != mc {
                return Err(LedgerError::Validation(
                    "driver and manager countries do not match".to_string(),
                ));
            }
        }

        let (gross, delivered_count) = self
            .gross_collected(actor.id, input.from, input.to)
            .await?;
        let settled = self
            .remittances
            .sum_accepted_for_driver(actor.id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        let available = (gross - settled).max(0.0);
        if input.amount > available {
            return Err(LedgerError::ExceedsAvailable {
                requested: input.amount,
                available,
            });
        }

        let remittance = Remittance {
            id: Uuid::new_v4(),
            driver_id: actor.id,
            manager_id: manager.id,
            owner_id: actor.owner_id,
            amount: input.amount,
            currency: input.currency,
            method: input.method,
            proof_ref: input.proof_ref,
            status: RemittanceStatus::Pending,
            total_delivered_orders: delivered_count,
            created_at: Utc::now(),
            resolved_at: None,
        };

        match self
            .remittances
            .try_insert_pending(&remittance)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?
        {
            PendingInsert::Inserted => Ok(remittance),
            PendingInsert::PendingExists(existing) => Err(LedgerError::PendingExists(existing)),
        }
    }

    pub async fn accept(&self, actor: &Actor, id: Uuid) -> Result<Remittance, LedgerError> {
        self.resolve(actor, id, RemittanceStatus::Accepted).await
    }

    pub async fn reject(&self, actor: &Actor, id: Uuid) -> Result<Remittance, LedgerError> {
        self.resolve(actor, id, RemittanceStatus::Rejected).await
    }

    async fn resolve(
        &self,
        actor: &Actor,
        id: Uuid,
        status: RemittanceStatus,
    ) -> Result<Remittance, LedgerError> {
        let mut remittance = self
            .remittances
            .get_remittance(id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or_else(|| LedgerError::NotFound(format!("remittance {}", id)))?;

        let allowed = actor.owner_id == remittance.owner_id
            && (actor.id == remittance.manager_id || actor.role.is_staff());
        if !allowed {
            return Err(LedgerError::Forbidden(
                "only the targeted manager or workspace staff may resolve".to_string(),
            ));
        }
        if remittance.status != RemittanceStatus::Pending {
            return Err(LedgerError::Validation(format!(
                "remittance is already {:?}",
                remittance.status
            )));
        }

        remittance.status = status;
        remittance.resolved_at = Some(Utc::now());
        // Conditional write: a racing resolution that got there first wins,
        // and this one surfaces as already-resolved instead of overwriting.
        let won = self
            .remittances
            .try_resolve_pending(&remittance)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        if !won {
            return Err(LedgerError::Validation(
                "remittance was already resolved".to_string(),
            ));
        }
        Ok(remittance)
    }
}
