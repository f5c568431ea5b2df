use async_trait::async_trait;
use despatch_core::{UserDirectory, UserProfile};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user-lookup collaborator. User management itself is ordinary
/// CRUD owned outside the core; the engine only reads profiles.
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<Uuid, UserProfile>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub async fn seed(&self, profile: UserProfile) {
        self.users.write().await.insert(profile.id, profile);
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user(
        &self,
        id: Uuid,
    ) -> Result<Option<UserProfile>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}
