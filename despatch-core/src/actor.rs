use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles that can touch the settlement core.
///
/// Admin, Manager and User are back-office staff scoped to a workspace.
/// Agents create orders and accrue commission; drivers deliver and remit
/// collected cash; investors only appear on the profit-distribution side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    User,
    Agent,
    Driver,
    Investor,
}

impl Role {
    /// Staff roles may mutate any order inside their workspace.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager | Role::User)
    }
}

/// The authenticated caller of a request, as resolved by the capability
/// checker. `owner_id` is the workspace owner every actor hangs under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub owner_id: Uuid,
    pub country: Option<String>,
}

/// Directory entry for the user-lookup collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub owner_id: Uuid,
    pub country: Option<String>,
}

/// Simple-lookup collaborator for user records. User management itself is
/// ordinary CRUD owned elsewhere; the core only ever reads.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(
        &self,
        id: Uuid,
    ) -> Result<Option<UserProfile>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Capability check collaborator. Token verification and session mechanics
/// live outside the core; this trait only answers "who is calling".
#[async_trait]
pub trait CapabilityChecker: Send + Sync {
    async fn resolve(
        &self,
        actor_id: Uuid,
    ) -> Result<Option<Actor>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Resolver backed by a [`UserDirectory`], which is what the deployed
/// system uses once the gateway has already verified the caller's token.
pub struct DirectoryCapabilityChecker {
    directory: std::sync::Arc<dyn UserDirectory>,
}

impl DirectoryCapabilityChecker {
    pub fn new(directory: std::sync::Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl CapabilityChecker for DirectoryCapabilityChecker {
    async fn resolve(
        &self,
        actor_id: Uuid,
    ) -> Result<Option<Actor>, Box<dyn std::error::Error + Send + Sync>> {
        let profile = self.directory.find_user(actor_id).await?;
        Ok(profile.map(|p| Actor {
            id: p.id,
            role: p.role,
            owner_id: p.owner_id,
            country: p.country,
        }))
    }
}
