//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No authenticated user in session")]
    MissingIdentity,

    #[error("Role not found: {0}")]
    RoleNotFound(Uuid),

    #[error("Permissions of the super-admin role {0} cannot be changed")]
    SuperAdminRoleLocked(Uuid),

    #[error("A permission update is already pending for role {0}")]
    MutationAlreadyPending(Uuid),

    #[error("No pending permission update for role {0}")]
    NoPendingMutation(Uuid),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(e: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(e.to_string())
    }
}
