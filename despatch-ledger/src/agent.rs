use crate::models::{AgentRemit, AgentRemitStatus, WalletSummary};
use crate::repository::AgentRemitRepository;
use crate::LedgerError;
use async_trait::async_trait;
use chrono::Utc;
use despatch_core::{Actor, Role, SettlementRules};
use despatch_order::{CommissionCalculator, OrderRepository};
use std::sync::Arc;
use uuid::Uuid;

/// Best-effort receipt-document delivery after a remit is finalized.
/// Failure is logged and swallowed; it never rolls back the sent state.
#[async_trait]
pub trait ReceiptSender: Send + Sync {
    async fn send_receipt(
        &self,
        remit: &AgentRemit,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Agent-to-owner ledger: commission accrual on delivered orders netted
/// against sent withdrawals. Single settlement currency (PKR).
pub struct AgentLedger {
    orders: Arc<dyn OrderRepository>,
    remits: Arc<dyn AgentRemitRepository>,
    calculator: CommissionCalculator,
    rules: SettlementRules,
    receipts: Option<Arc<dyn ReceiptSender>>,
}

impl AgentLedger {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        remits: Arc<dyn AgentRemitRepository>,
        calculator: CommissionCalculator,
        rules: SettlementRules,
        receipts: Option<Arc<dyn ReceiptSender>>,
    ) -> Self {
        Self {
            orders,
            remits,
            calculator,
            rules,
            receipts,
        }
    }

    /// Gross commission in PKR across the agent's delivered orders. Orders
    /// delivered before snapshotting existed fall back to the canonical
    /// on-the-fly formula (rate × FX), the same one the calculator uses.
    pub async fn gross_commission(&self, agent_id: Uuid) -> Result<(f64, u64), LedgerError> {
        let delivered = self
            .orders
            .list_delivered_by_creator(agent_id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        let gross = delivered
            .iter()
            .map(|o| {
                o.agent_commission_pkr
                    .unwrap_or_else(|| self.calculator.commission_for(o.effective_total(), &o.currency))
            })
            .sum();
        Ok((gross, delivered.len() as u64))
    }

    pub async fn wallet(&self, agent_id: Uuid) -> Result<WalletSummary, LedgerError> {
        let (gross, delivered_orders) = self.gross_commission(agent_id).await?;
        let settled = self
            .remits
            .sum_sent_for_agent(agent_id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(WalletSummary {
            gross,
            settled,
            available: (gross - settled).max(0.0),
            delivered_orders,
        })
    }

    /// Submit a withdrawal request on behalf of an agent.
    pub async fn submit(
        &self,
        actor: &Actor,
        amount: f64,
        note: Option<String>,
    ) -> Result<AgentRemit, LedgerError> {
        if actor.role != Role::Agent {
            return Err(LedgerError::Forbidden(
                "only agents submit withdrawal requests".to_string(),
            ));
        }
        if amount < self.rules.min_agent_payout {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: self.rules.min_agent_payout,
            });
        }
        let wallet = self.wallet(actor.id).await?;
        if amount > wallet.available {
            return Err(LedgerError::ExceedsAvailable {
                requested: amount,
                available: wallet.available,
            });
        }

        let remit = AgentRemit {
            id: Uuid::new_v4(),
            agent_id: actor.id,
            owner_id: actor.owner_id,
            amount,
            note,
            status: AgentRemitStatus::Pending,
            approved_by: None,
            approved_at: None,
            sent_by: None,
            sent_at: None,
            created_at: Utc::now(),
        };
        self.remits
            .insert_remit(&remit)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(remit)
    }

    /// First approval step, by the designated approver (workspace staff).
    pub async fn approve(&self, actor: &Actor, id: Uuid) -> Result<AgentRemit, LedgerError> {
        let mut remit = self.fetch(id).await?;
        if !actor.role.is_staff() || actor.owner_id != remit.owner_id {
            return Err(LedgerError::Forbidden(
                "only workspace staff may approve".to_string(),
            ));
        }
        if remit.status != AgentRemitStatus::Pending {
            return Err(LedgerError::Validation(format!(
                "remit is already {:?}",
                remit.status
            )));
        }
        remit.status = AgentRemitStatus::Approved;
        remit.approved_by = Some(actor.id);
        remit.approved_at = Some(Utc::now());
        let won = self
            .remits
            .try_advance_remit(&remit, AgentRemitStatus::Pending)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        if !won {
            return Err(LedgerError::Validation(
                "remit was already advanced past pending".to_string(),
            ));
        }
        Ok(remit)
    }

    /// Final send step, by the owner. Re-validates the amount against a
    /// freshly recomputed available balance: time may have passed since
    /// approval and other requests may have consumed balance meanwhile.
    pub async fn send(&self, actor: &Actor, id: Uuid) -> Result<AgentRemit, LedgerError> {
        let mut remit = self.fetch(id).await?;
        let is_owner = actor.id == remit.owner_id || actor.role == Role::Admin;
        if !is_owner || actor.owner_id != remit.owner_id {
            return Err(LedgerError::Forbidden(
                "only the workspace owner may send".to_string(),
            ));
        }
        if remit.status != AgentRemitStatus::Approved {
            return Err(LedgerError::Validation(format!(
                "remit must be approved before sending, currently {:?}",
                remit.status
            )));
        }

        let wallet = self.wallet(remit.agent_id).await?;
        if remit.amount > wallet.available {
            return Err(LedgerError::ExceedsAvailable {
                requested: remit.amount,
                available: wallet.available,
            });
        }

        remit.status = AgentRemitStatus::Sent;
        remit.sent_by = Some(actor.id);
        remit.sent_at = Some(Utc::now());
        let won = self
            .remits
            .try_advance_remit(&remit, AgentRemitStatus::Approved)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        if !won {
            return Err(LedgerError::Validation(
                "remit was already sent".to_string(),
            ));
        }

        if let Some(receipts) = &self.receipts {
            if let Err(e) = receipts.send_receipt(&remit).await {
                tracing::warn!(remit_id = %remit.id, error = %e, "receipt delivery failed");
            }
        }

        Ok(remit)
    }

    async fn fetch(&self, id: Uuid) -> Result<AgentRemit, LedgerError> {
        self.remits
            .get_remit(id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or_else(|| LedgerError::NotFound(format!("agent remit {}", id)))
    }
}
