//! Roles & permissions API (port)

use async_trait::async_trait;
use uuid::Uuid;

use pos_shared::{Page, Pagination};

use crate::domain::{Permission, Role};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionApi: Send + Sync {
    /// Roles with their nested permission assignments, already resolved to
    /// the canonical `Role` shape.
    async fn fetch_roles(&self, page: Pagination) -> Result<Page<Role>, DomainError>;

    async fn fetch_permissions(&self, page: Pagination) -> Result<Page<Permission>, DomainError>;

    /// Replaces the role's whole permission set. Idempotent for the same
    /// target set. Returns the updated role when the server sends one back.
    async fn assign_permissions(
        &self,
        role_id: Uuid,
        permission_ids: Vec<Uuid>,
    ) -> Result<Option<Role>, DomainError>;
}
