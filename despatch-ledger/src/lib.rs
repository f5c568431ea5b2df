pub mod agent;
pub mod driver;
pub mod models;
pub mod repository;

pub use agent::{AgentLedger, ReceiptSender};
pub use driver::DriverLedger;
pub use models::{AgentRemit, AgentRemitStatus, RemitMethod, Remittance, RemittanceStatus};
pub use repository::{AgentRemitRepository, PendingInsert, RemittanceRepository};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A pending remittance already exists for this driver: {0}")]
    PendingExists(uuid::Uuid),

    #[error("Amount {amount} is below the minimum payout of {minimum}")]
    BelowMinimum { amount: f64, minimum: f64 },

    #[error("Requested {requested} exceeds available balance {available}")]
    ExceedsAvailable { requested: f64, available: f64 },

    #[error("Ledger storage failure: {0}")]
    Storage(String),
}
