use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderDeliveredEvent {
    pub order_id: Uuid,
    pub invoice_no: String,
    pub owner_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub collected_amount: f64,
    pub commission_pkr: Option<f64>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct RemittanceSubmittedEvent {
    pub remittance_id: Uuid,
    pub driver_id: Uuid,
    pub manager_id: Uuid,
    pub amount: f64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct AgentRemitSentEvent {
    pub remit_id: Uuid,
    pub agent_id: Uuid,
    pub amount: f64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct DailyProfitEvent {
    pub request_id: Uuid,
    pub investor_id: Uuid,
    pub amount: f64,
    pub date: String,
    pub timestamp: i64,
}
