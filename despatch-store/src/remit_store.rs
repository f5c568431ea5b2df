use async_trait::async_trait;
use despatch_ledger::{
    AgentRemit, AgentRemitRepository, AgentRemitStatus, PendingInsert, Remittance,
    RemittanceRepository, RemittanceStatus,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory driver remittance collection. The one-pending-per-driver
/// invariant and the resolve-exactly-once status chain are both enforced
/// under the write lock, inside `try_insert_pending` and
/// `try_resolve_pending`.
pub struct MemoryRemittanceStore {
    remittances: RwLock<HashMap<Uuid, Remittance>>,
}

impl MemoryRemittanceStore {
    pub fn new() -> Self {
        Self {
            remittances: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRemittanceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemittanceRepository for MemoryRemittanceStore {
    async fn try_insert_pending(
        &self,
        remittance: &Remittance,
    ) -> Result<PendingInsert, Box<dyn std::error::Error + Send + Sync>> {
        let mut remittances = self.remittances.write().await;
        if let Some(existing) = remittances
            .values()
            .find(|r| r.driver_id == remittance.driver_id && r.status == RemittanceStatus::Pending)
        {
            return Ok(PendingInsert::PendingExists(existing.id));
        }
        remittances.insert(remittance.id, remittance.clone());
        Ok(PendingInsert::Inserted)
    }

    async fn get_remittance(
        &self,
        id: Uuid,
    ) -> Result<Option<Remittance>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.remittances.read().await.get(&id).cloned())
    }

    async fn try_resolve_pending(
        &self,
        remittance: &Remittance,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut remittances = self.remittances.write().await;
        let stored = remittances
            .get(&remittance.id)
            .ok_or_else(|| format!("remittance {} not found", remittance.id))?;
        if stored.status != RemittanceStatus::Pending {
            return Ok(false);
        }
        remittances.insert(remittance.id, remittance.clone());
        Ok(true)
    }

    async fn list_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<Remittance>, Box<dyn std::error::Error + Send + Sync>> {
        let mut result: Vec<Remittance> = self
            .remittances
            .read()
            .await
            .values()
            .filter(|r| r.driver_id == driver_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn sum_accepted_for_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .remittances
            .read()
            .await
            .values()
            .filter(|r| r.driver_id == driver_id && r.status == RemittanceStatus::Accepted)
            .map(|r| r.amount)
            .sum())
    }
}

/// In-memory agent withdrawal collection.
pub struct MemoryAgentRemitStore {
    remits: RwLock<HashMap<Uuid, AgentRemit>>,
}

impl MemoryAgentRemitStore {
    pub fn new() -> Self {
        Self {
            remits: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryAgentRemitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRemitRepository for MemoryAgentRemitStore {
    async fn insert_remit(
        &self,
        remit: &AgentRemit,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.remits.write().await.insert(remit.id, remit.clone());
        Ok(remit.id)
    }

    async fn get_remit(
        &self,
        id: Uuid,
    ) -> Result<Option<AgentRemit>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.remits.read().await.get(&id).cloned())
    }

    async fn try_advance_remit(
        &self,
        remit: &AgentRemit,
        expected: AgentRemitStatus,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut remits = self.remits.write().await;
        let stored = remits
            .get(&remit.id)
            .ok_or_else(|| format!("agent remit {} not found", remit.id))?;
        if stored.status != expected {
            return Ok(false);
        }
        remits.insert(remit.id, remit.clone());
        Ok(true)
    }

    async fn list_for_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<AgentRemit>, Box<dyn std::error::Error + Send + Sync>> {
        let mut result: Vec<AgentRemit> = self
            .remits
            .read()
            .await
            .values()
            .filter(|r| r.agent_id == agent_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn sum_sent_for_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .remits
            .read()
            .await
            .values()
            .filter(|r| r.agent_id == agent_id && r.status == AgentRemitStatus::Sent)
            .map(|r| r.amount)
            .sum())
    }
}
