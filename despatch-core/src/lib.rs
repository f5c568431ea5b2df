pub mod actor;
pub mod fx;
pub mod rules;

pub use actor::{
    Actor, CapabilityChecker, DirectoryCapabilityChecker, Role, UserDirectory, UserProfile,
};
pub use fx::FxTable;
pub use rules::SettlementRules;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Forbidden: {0}")]
    AuthorizationError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("External collaborator failure: {0}")]
    CollaboratorError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
