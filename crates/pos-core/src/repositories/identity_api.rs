//! Current user identity (port)

use async_trait::async_trait;

use crate::domain::CurrentUser;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// `Ok(None)` when the session is anonymous.
    async fn current_user(&self) -> Result<Option<CurrentUser>, DomainError>;
}
