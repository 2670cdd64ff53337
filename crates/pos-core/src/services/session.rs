// ============================================================================
// POS Core - Session Context
// File: crates/pos-core/src/services/session.rs
// ============================================================================
//! Explicit per-session state: who is signed in, and what they may see.

use tracing::{info, warn};

use crate::domain::{default_navigation, BreadcrumbItem, CurrentUser, NavigationItem};
use crate::error::DomainError;
use crate::repositories::IdentityApi;
use crate::services::breadcrumb_resolver::BreadcrumbResolver;
use crate::services::navigation_filter::filter_navigation;

pub struct SessionContext {
    user: Option<CurrentUser>,
    navigation: Vec<NavigationItem>,
    breadcrumbs: BreadcrumbResolver,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(default_navigation(), BreadcrumbResolver::default())
    }
}

impl SessionContext {
    pub fn new(navigation: Vec<NavigationItem>, breadcrumbs: BreadcrumbResolver) -> Self {
        Self {
            user: None,
            navigation,
            breadcrumbs,
        }
    }

    pub fn sign_in(&mut self, user: CurrentUser) {
        info!("Session user set: {} ({} roles)", user.id, user.roles.len());
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Session user cleared: {}", user.id);
        }
    }

    /// Replaces the session user with whatever the identity API reports.
    pub async fn refresh<I: IdentityApi + ?Sized>(&mut self, api: &I) -> Result<Option<&CurrentUser>, DomainError> {
        match api.current_user().await? {
            Some(user) => self.sign_in(user),
            None => self.sign_out(),
        }
        Ok(self.user.as_ref())
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Fails fast instead of defaulting to an anonymous view.
    pub fn require_user(&self) -> Result<&CurrentUser, DomainError> {
        self.user.as_ref().ok_or_else(|| {
            warn!("Identity required but no user is signed in");
            DomainError::MissingIdentity
        })
    }

    /// Sidebar for the signed-in user, recomputed on every call.
    pub fn visible_navigation(&self) -> Result<Vec<NavigationItem>, DomainError> {
        let user = self.require_user()?;
        Ok(filter_navigation(&self.navigation, &user.roles))
    }

    pub fn has_permission(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.require_user()?.has_permission(name))
    }

    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbItem> {
        self.breadcrumbs.resolve(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Permission, PermissionAssignment, Role, RoleName};
    use crate::repositories::MockIdentityApi;
    use uuid::Uuid;

    fn user(roles: Vec<RoleName>) -> CurrentUser {
        CurrentUser::new(Uuid::new_v4(), "Luis".into(), roles)
    }

    #[test]
    fn test_missing_identity_fails_fast() {
        let session = SessionContext::default();
        assert_eq!(session.require_user().unwrap_err(), DomainError::MissingIdentity);
        assert_eq!(session.visible_navigation().unwrap_err(), DomainError::MissingIdentity);
        assert_eq!(session.has_permission("orders:read").unwrap_err(), DomainError::MissingIdentity);
    }

    #[test]
    fn test_navigation_follows_identity_changes() {
        let mut session = SessionContext::default();
        session.sign_in(user(vec![RoleName::Waiter]));
        let waiter_paths: Vec<String> = session.visible_navigation().unwrap().into_iter().map(|i| i.path).collect();
        assert!(waiter_paths.contains(&"/tables".to_string()));
        assert!(!waiter_paths.contains(&"/users".to_string()));

        session.sign_in(user(vec![RoleName::Admin]));
        let admin_paths: Vec<String> = session.visible_navigation().unwrap().into_iter().map(|i| i.path).collect();
        assert!(admin_paths.contains(&"/users".to_string()));

        session.sign_out();
        assert!(session.visible_navigation().is_err());
    }

    #[test]
    fn test_breadcrumbs_do_not_need_identity() {
        let session = SessionContext::default();
        assert_eq!(session.breadcrumbs("/tables").len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_from_identity_api() {
        let mut api = MockIdentityApi::new();
        let u = user(vec![RoleName::Cashier]);
        let expected = u.clone();
        api.expect_current_user().times(1).returning(move || Ok(Some(u.clone())));

        let mut session = SessionContext::default();
        let current = session.refresh(&api).await.unwrap().cloned();
        assert_eq!(current, Some(expected));
        assert!(!session.has_permission("orders:pay").unwrap());
    }

    #[tokio::test]
    async fn test_refresh_picks_up_role_permissions() {
        let mut api = MockIdentityApi::new();
        let mut role = Role::new(Uuid::new_v4(), RoleName::Cashier);
        let pay = Permission::new(Uuid::new_v4(), "orders:pay".into(), None).unwrap();
        role.permissions.push(PermissionAssignment { permission_id: pay.id, permission: Some(pay) });
        let u = CurrentUser::from_roles(Uuid::new_v4(), "Ana".into(), None, &[role]);
        api.expect_current_user().returning(move || Ok(Some(u.clone())));

        let mut session = SessionContext::default();
        session.refresh(&api).await.unwrap();
        assert!(session.has_permission("orders:pay").unwrap());
        assert!(!session.has_permission("users:delete").unwrap());
    }

    #[tokio::test]
    async fn test_refresh_anonymous_signs_out() {
        let mut api = MockIdentityApi::new();
        api.expect_current_user().returning(|| Ok(None));

        let mut session = SessionContext::default();
        session.sign_in(user(vec![RoleName::Admin]));
        assert!(session.refresh(&api).await.unwrap().is_none());
        assert!(session.current_user().is_none());
    }
}
