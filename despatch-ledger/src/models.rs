use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemitMethod {
    Cash,
    Transfer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemittanceStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Driver → manager/owner cash transfer request. Mutated exactly once
/// (pending → accepted/rejected), immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Remittance {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub manager_id: Uuid,
    pub owner_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub method: RemitMethod,
    /// Proof-of-transfer artifact reference; mandatory for transfers.
    pub proof_ref: Option<String>,
    pub status: RemittanceStatus,
    /// Snapshot of the driver's delivered-order count at submission time.
    pub total_delivered_orders: u64,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentRemitStatus {
    Pending,
    Approved,
    Sent,
}

/// Agent → owner withdrawal request, denominated in the single settlement
/// currency (PKR). Two-step approval: pending → approved → sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRemit {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub owner_id: Uuid,
    pub amount: f64,
    pub note: Option<String>,
    pub status: AgentRemitStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub sent_by: Option<Uuid>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Read-only wallet summary: gross accrual minus settled transfers,
/// recomputed on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSummary {
    pub gross: f64,
    pub settled: f64,
    pub available: f64,
    pub delivered_orders: u64,
}
