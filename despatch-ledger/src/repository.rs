use crate::models::{AgentRemit, AgentRemitStatus, Remittance};
use async_trait::async_trait;
use uuid::Uuid;

/// Outcome of the conditional pending-remittance insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInsert {
    Inserted,
    /// Another remittance for this driver is already pending; carries its id.
    PendingExists(Uuid),
}

/// Repository trait for driver remittances. `try_insert_pending` enforces
/// the one-pending-per-driver invariant under the collection's own guard,
/// never as a separate existence check followed by a write.
#[async_trait]
pub trait RemittanceRepository: Send + Sync {
    async fn try_insert_pending(
        &self,
        remittance: &Remittance,
    ) -> Result<PendingInsert, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_remittance(
        &self,
        id: Uuid,
    ) -> Result<Option<Remittance>, Box<dyn std::error::Error + Send + Sync>>;

    /// Write the resolved remittance only if the stored copy is still
    /// pending. Returns false when another resolution already won; the
    /// status chain mutates exactly once.
    async fn try_resolve_pending(
        &self,
        remittance: &Remittance,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<Remittance>, Box<dyn std::error::Error + Send + Sync>>;

    /// Sum of this driver's accepted remittance amounts.
    async fn sum_accepted_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for agent withdrawal requests.
#[async_trait]
pub trait AgentRemitRepository: Send + Sync {
    async fn insert_remit(
        &self,
        remit: &AgentRemit,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_remit(
        &self,
        id: Uuid,
    ) -> Result<Option<AgentRemit>, Box<dyn std::error::Error + Send + Sync>>;

    /// Write the advanced remit only if the stored copy still carries
    /// `expected`. Returns false when another writer advanced it first.
    async fn try_advance_remit(
        &self,
        remit: &AgentRemit,
        expected: AgentRemitStatus,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<AgentRemit>, Box<dyn std::error::Error + Send + Sync>>;

    /// Sum of this agent's sent remit amounts.
    async fn sum_sent_for_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}
