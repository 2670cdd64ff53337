// ============================================================================
// POS Core - Permission Matrix Service
// File: crates/pos-core/src/services/permission_matrix.rs
// ============================================================================
//! Role x permission matrix with optimistic toggling.
//!
//! Toggles on the same role are serialized through a per-role async lock, so
//! each submission starts from the state the previous one left behind.
//! Toggles on different roles run independently.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{group_by_module, Permission, Role, RoleName};
use crate::error::DomainError;
use crate::repositories::PermissionApi;
use crate::services::notifications::{NotificationLevel, Notifier};
use crate::services::pagination::fetch_all;
use crate::services::permission_toggle::toggle_permission;
use crate::services::role_mutation::{MutationPhase, RoleMutation};

struct RoleEntry {
    name: RoleName,
    description: Option<String>,
    mutation: RoleMutation,
}

struct RoleSlot {
    entry: Mutex<RoleEntry>,
    submit: tokio::sync::Mutex<()>,
}

impl RoleSlot {
    fn new(role: &Role) -> Self {
        Self {
            entry: Mutex::new(RoleEntry {
                name: role.name.clone(),
                description: role.description.clone(),
                mutation: RoleMutation::new(role.id, role.assigned_permission_ids()),
            }),
            submit: tokio::sync::Mutex::new(()),
        }
    }
}

/// Per-role input to the matrix view.
#[derive(Debug, Clone)]
pub struct MatrixRoleState {
    pub id: Uuid,
    pub name: RoleName,
    pub assigned: BTreeSet<Uuid>,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRole {
    pub id: Uuid,
    pub name: RoleName,
    pub editable: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    pub role_id: Uuid,
    pub assigned: bool,
    pub editable: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub permission: Permission,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixGroup {
    pub module: String,
    pub rows: Vec<MatrixRow>,
}

/// Rendered matrix: permissions grouped by module, one cell per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionMatrix {
    pub roles: Vec<MatrixRole>,
    pub groups: Vec<MatrixGroup>,
}

impl PermissionMatrix {
    /// The super-admin column is always assigned and never editable.
    pub fn build(roles: &[MatrixRoleState], permissions: &[Permission]) -> Self {
        let columns = roles
            .iter()
            .map(|r| MatrixRole {
                id: r.id,
                name: r.name.clone(),
                editable: !r.name.is_super_admin(),
                pending: r.pending,
            })
            .collect();

        let groups = group_by_module(permissions)
            .into_iter()
            .map(|group| MatrixGroup {
                module: group.module,
                rows: group
                    .permissions
                    .into_iter()
                    .map(|permission| {
                        let cells = roles
                            .iter()
                            .map(|r| {
                                let locked = r.name.is_super_admin();
                                MatrixCell {
                                    role_id: r.id,
                                    assigned: locked || r.assigned.contains(&permission.id),
                                    editable: !locked && !r.pending,
                                    pending: r.pending,
                                }
                            })
                            .collect();
                        MatrixRow { permission, cells }
                    })
                    .collect(),
            })
            .collect();

        Self { roles: columns, groups }
    }

    pub fn cell(&self, permission_id: Uuid, role_id: Uuid) -> Option<&MatrixCell> {
        self.groups
            .iter()
            .flat_map(|g| g.rows.iter())
            .find(|row| row.permission.id == permission_id)?
            .cells
            .iter()
            .find(|c| c.role_id == role_id)
    }
}

/// Loads roles and permissions and applies single-checkbox toggles.
pub struct PermissionMatrixService<A: PermissionApi> {
    api: Arc<A>,
    notifier: Notifier,
    page_size: u32,
    roles: DashMap<Uuid, Arc<RoleSlot>>,
    role_order: RwLock<Vec<Uuid>>,
    permissions: RwLock<Vec<Permission>>,
}

impl<A: PermissionApi + 'static> PermissionMatrixService<A> {
    pub fn new(api: Arc<A>, notifier: Notifier, page_size: u32) -> Self {
        Self {
            api,
            notifier,
            page_size,
            roles: DashMap::new(),
            role_order: RwLock::new(Vec::new()),
            permissions: RwLock::new(Vec::new()),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Fetches every page of roles and permissions. Roles with a submission in
    /// flight keep their local state; the rest adopt the server's.
    pub async fn load(&self) -> Result<(), DomainError> {
        let roles = fetch_all(self.page_size, |p| self.api.fetch_roles(p)).await?;
        let permissions = fetch_all(self.page_size, |p| self.api.fetch_permissions(p)).await?;

        let mut seen = HashSet::with_capacity(roles.len());
        let mut order = Vec::with_capacity(roles.len());
        for role in &roles {
            if !seen.insert(role.id) {
                continue;
            }
            order.push(role.id);
            match self.roles.get(&role.id).map(|s| Arc::clone(s.value())) {
                Some(slot) => {
                    let mut entry = slot.entry.lock();
                    entry.name = role.name.clone();
                    entry.description = role.description.clone();
                    if !entry.mutation.reconcile(role.assigned_permission_ids()) {
                        debug!("Role {} has a pending update, keeping local state", role.id);
                    }
                }
                None => {
                    self.roles.insert(role.id, Arc::new(RoleSlot::new(role)));
                }
            }
        }
        self.roles
            .retain(|id, slot| seen.contains(id) || slot.entry.lock().mutation.is_pending());

        info!("Loaded {} roles and {} permissions", order.len(), permissions.len());
        *self.role_order.write() = order;
        *self.permissions.write() = permissions;
        Ok(())
    }

    fn slot(&self, role_id: Uuid) -> Result<Arc<RoleSlot>, DomainError> {
        self.roles
            .get(&role_id)
            .map(|s| Arc::clone(s.value()))
            .ok_or(DomainError::RoleNotFound(role_id))
    }

    pub fn permissions(&self) -> Vec<Permission> {
        self.permissions.read().clone()
    }

    /// Permission ids currently shown for the role (optimistic while pending).
    pub fn displayed_permissions(&self, role_id: Uuid) -> Result<BTreeSet<Uuid>, DomainError> {
        let slot = self.slot(role_id)?;
        let entry = slot.entry.lock();
        Ok(entry.mutation.displayed().clone())
    }

    pub fn phase(&self, role_id: Uuid) -> Result<MutationPhase, DomainError> {
        let slot = self.slot(role_id)?;
        let entry = slot.entry.lock();
        Ok(entry.mutation.phase().clone())
    }

    pub fn is_pending(&self, role_id: Uuid) -> bool {
        self.slot(role_id)
            .map(|slot| slot.entry.lock().mutation.is_pending())
            .unwrap_or(false)
    }

    pub fn matrix(&self) -> PermissionMatrix {
        let states: Vec<MatrixRoleState> = self
            .role_order
            .read()
            .iter()
            .filter_map(|id| {
                let slot = self.roles.get(id).map(|s| Arc::clone(s.value()))?;
                let entry = slot.entry.lock();
                Some(MatrixRoleState {
                    id: *id,
                    name: entry.name.clone(),
                    assigned: entry.mutation.displayed().clone(),
                    pending: entry.mutation.is_pending(),
                })
            })
            .collect();
        PermissionMatrix::build(&states, &self.permissions.read())
    }

    /// Flips one permission for a role and submits the full resulting set.
    ///
    /// Waits for any earlier toggle on the same role to settle first. On
    /// failure the role's previous set is restored and an error notification
    /// is published.
    pub async fn toggle(&self, role_id: Uuid, permission_id: Uuid) -> Result<BTreeSet<Uuid>, DomainError> {
        let slot = self.slot(role_id)?;
        let locked = slot.entry.lock().name.is_super_admin();
        if locked {
            warn!("Refusing permission toggle on super-admin role {}", role_id);
            return Err(DomainError::SuperAdminRoleLocked(role_id));
        }

        let _submit = slot.submit.lock().await;

        let (next, was_assigned) = {
            let mut entry = slot.entry.lock();
            let current = entry.mutation.displayed().clone();
            let was_assigned = current.contains(&permission_id);
            let next = toggle_permission(&current, permission_id, was_assigned);
            entry.mutation.begin(next.clone())?;
            (next, was_assigned)
        };
        info!(
            "Submitting {} permissions for role {} ({} {})",
            next.len(),
            role_id,
            if was_assigned { "revoke" } else { "grant" },
            permission_id
        );

        match self.api.assign_permissions(role_id, next.iter().copied().collect()).await {
            Ok(updated) => {
                let server = updated.map(|role| role.assigned_permission_ids());
                let confirmed = {
                    let mut entry = slot.entry.lock();
                    entry.mutation.commit(server)?.clone()
                };
                self.notifier.publish(
                    NotificationLevel::Success,
                    "Permisos actualizados",
                    Some(role_id),
                );
                Ok(confirmed)
            }
            Err(e) => {
                {
                    let mut entry = slot.entry.lock();
                    entry.mutation.rollback()?;
                }
                error!("Permission update for role {} failed: {}", role_id, e);
                self.notifier.publish(
                    NotificationLevel::Error,
                    format!("No se pudieron actualizar los permisos: {}", e),
                    Some(role_id),
                );
                Err(e)
            }
        }
    }

    /// Runs `toggle` on the runtime. The task completes even if the handle
    /// is dropped; its outcome then only shows up through the notifier.
    pub fn spawn_toggle(
        self: &Arc<Self>,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> JoinHandle<Result<BTreeSet<Uuid>, DomainError>> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.toggle(role_id, permission_id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockPermissionApi;
    use async_trait::async_trait;
    use pos_shared::{Page, PageMeta, Pagination};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn single_page<T>(data: Vec<T>) -> Page<T> {
        let total = data.len() as u64;
        Page {
            data,
            meta: PageMeta { page: 1, limit: 50, total, total_pages: 1 },
        }
    }

    fn perm(name: &str) -> Permission {
        Permission::new(Uuid::new_v4(), name.to_string(), None).unwrap()
    }

    fn mock_with(roles: Vec<Role>, permissions: Vec<Permission>) -> MockPermissionApi {
        let mut api = MockPermissionApi::new();
        api.expect_fetch_roles()
            .returning(move |_| Ok(single_page(roles.clone())));
        api.expect_fetch_permissions()
            .returning(move |_| Ok(single_page(permissions.clone())));
        api
    }

    #[tokio::test]
    async fn test_toggle_grants_and_submits_full_set() {
        let (p1, p2) = (perm("orders:read"), perm("orders:create"));
        let role = Role::new(Uuid::new_v4(), RoleName::Waiter).with_permissions([p1.id]);
        let role_id = role.id;
        let expected: Vec<Uuid> = {
            let mut v = vec![p1.id, p2.id];
            v.sort();
            v
        };

        let mut api = mock_with(vec![role], vec![p1.clone(), p2.clone()]);
        api.expect_assign_permissions()
            .withf(move |id, ids| *id == role_id && *ids == expected)
            .times(1)
            .returning(|_, _| Ok(None));

        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        let mut rx = service.notifier().subscribe();

        let confirmed = service.toggle(role_id, p2.id).await.unwrap();
        assert_eq!(confirmed, [p1.id, p2.id].into_iter().collect());
        assert_eq!(service.phase(role_id).unwrap(), MutationPhase::Committed);
        assert_eq!(rx.recv().await.unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_toggle_revokes_assigned_permission() {
        let p1 = perm("tables:read");
        let role = Role::new(Uuid::new_v4(), RoleName::Admin).with_permissions([p1.id]);
        let role_id = role.id;

        let mut api = mock_with(vec![role], vec![p1.clone()]);
        api.expect_assign_permissions()
            .withf(|_, ids| ids.is_empty())
            .returning(|_, _| Ok(None));

        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        assert!(service.toggle(role_id, p1.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_rolls_back_and_notifies() {
        let (p1, p2) = (perm("orders:read"), perm("orders:void"));
        let role = Role::new(Uuid::new_v4(), RoleName::Cashier).with_permissions([p1.id]);
        let role_id = role.id;

        let mut api = mock_with(vec![role], vec![p1.clone(), p2.clone()]);
        api.expect_assign_permissions()
            .returning(|_, _| Err(DomainError::Api { status: 422, message: "invalid".into() }));

        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        let mut rx = service.notifier().subscribe();

        let err = service.toggle(role_id, p2.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Api { status: 422, .. }));
        assert_eq!(service.phase(role_id).unwrap(), MutationPhase::RolledBack);
        assert_eq!(service.displayed_permissions(role_id).unwrap(), [p1.id].into_iter().collect());

        let n = rx.recv().await.unwrap();
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.role_id, Some(role_id));
    }

    #[tokio::test]
    async fn test_server_echo_wins_over_optimistic() {
        let (p1, p2, p3) = (perm("a:x"), perm("a:y"), perm("a:z"));
        let role = Role::new(Uuid::new_v4(), RoleName::Manager);
        let role_id = role.id;
        let echoed = Role::new(role_id, RoleName::Manager).with_permissions([p1.id, p3.id]);

        let mut api = mock_with(vec![role], vec![p1.clone(), p2.clone(), p3.clone()]);
        api.expect_assign_permissions()
            .returning(move |_, _| Ok(Some(echoed.clone())));

        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        let confirmed = service.toggle(role_id, p1.id).await.unwrap();
        assert_eq!(confirmed, [p1.id, p3.id].into_iter().collect());
    }

    #[tokio::test]
    async fn test_super_admin_toggle_refused() {
        let p1 = perm("users:delete");
        let role = Role::new(Uuid::new_v4(), RoleName::SuperAdmin);
        let role_id = role.id;

        let mut api = mock_with(vec![role], vec![p1.clone()]);
        api.expect_assign_permissions().never();

        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        assert_eq!(
            service.toggle(role_id, p1.id).await.unwrap_err(),
            DomainError::SuperAdminRoleLocked(role_id)
        );

        let matrix = service.matrix();
        let cell = matrix.cell(p1.id, role_id).unwrap();
        assert!(cell.assigned);
        assert!(!cell.editable);
    }

    #[tokio::test]
    async fn test_unknown_role() {
        let api = mock_with(vec![], vec![]);
        let service = PermissionMatrixService::new(Arc::new(api), Notifier::new(8), 50);
        service.load().await.unwrap();
        let missing = Uuid::new_v4();
        assert_eq!(
            service.toggle(missing, Uuid::new_v4()).await.unwrap_err(),
            DomainError::RoleNotFound(missing)
        );
    }

    #[test]
    fn test_matrix_build_groups_and_cells() {
        let (a, b, c) = (perm("tables:read"), perm("orders:read"), perm("orders:create"));
        let waiter = MatrixRoleState {
            id: Uuid::new_v4(),
            name: RoleName::Waiter,
            assigned: [b.id].into_iter().collect(),
            pending: false,
        };
        let cashier = MatrixRoleState {
            id: Uuid::new_v4(),
            name: RoleName::Cashier,
            assigned: BTreeSet::new(),
            pending: true,
        };
        let matrix = PermissionMatrix::build(&[waiter.clone(), cashier.clone()], &[a.clone(), b.clone(), c.clone()]);

        assert_eq!(matrix.roles.len(), 2);
        assert_eq!(matrix.groups.len(), 2);
        assert_eq!(matrix.groups[0].module, "orders");
        assert_eq!(matrix.groups[0].rows.len(), 2);

        let cell = matrix.cell(b.id, waiter.id).unwrap();
        assert!(cell.assigned && cell.editable && !cell.pending);

        let cell = matrix.cell(c.id, cashier.id).unwrap();
        assert!(!cell.assigned && !cell.editable && cell.pending);
        assert!(matrix.cell(Uuid::new_v4(), waiter.id).is_none());
    }

    /// Holds every `assign_permissions` call until a permit is released.
    struct GatedApi {
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        gate: Semaphore,
        calls: parking_lot::Mutex<Vec<(Uuid, Vec<Uuid>)>>,
        fail_first: bool,
    }

    impl GatedApi {
        fn new(roles: Vec<Role>, permissions: Vec<Permission>, fail_first: bool) -> Self {
            Self {
                roles,
                permissions,
                gate: Semaphore::new(0),
                calls: parking_lot::Mutex::new(Vec::new()),
                fail_first,
            }
        }

        fn calls(&self) -> Vec<(Uuid, Vec<Uuid>)> {
            self.calls.lock().clone()
        }

        async fn wait_for_calls(&self, n: usize) {
            tokio::time::timeout(Duration::from_secs(2), async {
                while self.calls.lock().len() < n {
                    tokio::task::yield_now().await;
                }
            })
            .await
            .expect("calls did not arrive in time");
        }
    }

    #[async_trait]
    impl PermissionApi for GatedApi {
        async fn fetch_roles(&self, _page: Pagination) -> Result<Page<Role>, DomainError> {
            Ok(single_page(self.roles.clone()))
        }

        async fn fetch_permissions(&self, _page: Pagination) -> Result<Page<Permission>, DomainError> {
            Ok(single_page(self.permissions.clone()))
        }

        async fn assign_permissions(&self, role_id: Uuid, ids: Vec<Uuid>) -> Result<Option<Role>, DomainError> {
            let index = {
                let mut calls = self.calls.lock();
                calls.push((role_id, ids));
                calls.len()
            };
            self.gate
                .acquire()
                .await
                .map_err(|e| DomainError::InternalError(e.to_string()))?
                .forget();
            if self.fail_first && index == 1 {
                return Err(DomainError::Transport("connection reset".into()));
            }
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_same_role_toggles_serialize() {
        let (p1, p2) = (perm("orders:read"), perm("orders:create"));
        let role = Role::new(Uuid::new_v4(), RoleName::Waiter);
        let role_id = role.id;
        let api = Arc::new(GatedApi::new(vec![role], vec![p1.clone(), p2.clone()], false));
        let service = Arc::new(PermissionMatrixService::new(Arc::clone(&api), Notifier::new(8), 50));
        service.load().await.unwrap();

        let first = service.spawn_toggle(role_id, p1.id);
        api.wait_for_calls(1).await;
        assert!(service.is_pending(role_id));
        assert_eq!(service.displayed_permissions(role_id).unwrap(), [p1.id].into_iter().collect());

        let second = service.spawn_toggle(role_id, p2.id);
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert_eq!(api.calls().len(), 1, "second toggle must wait for the first");

        api.gate.add_permits(1);
        first.await.unwrap().unwrap();
        api.wait_for_calls(2).await;

        let mut expected = vec![p1.id, p2.id];
        expected.sort();
        assert_eq!(api.calls()[1], (role_id, expected));

        api.gate.add_permits(1);
        let confirmed = second.await.unwrap().unwrap();
        assert_eq!(confirmed, [p1.id, p2.id].into_iter().collect());
    }

    #[tokio::test]
    async fn test_failed_first_toggle_does_not_leak_into_second() {
        let (p1, p2) = (perm("menu:read"), perm("menu:update"));
        let role = Role::new(Uuid::new_v4(), RoleName::Manager);
        let role_id = role.id;
        let api = Arc::new(GatedApi::new(vec![role], vec![p1.clone(), p2.clone()], true));
        let service = Arc::new(PermissionMatrixService::new(Arc::clone(&api), Notifier::new(8), 50));
        service.load().await.unwrap();

        let first = service.spawn_toggle(role_id, p1.id);
        api.wait_for_calls(1).await;
        let second = service.spawn_toggle(role_id, p2.id);

        api.gate.add_permits(2);
        assert!(first.await.unwrap().is_err());
        let confirmed = second.await.unwrap().unwrap();

        assert_eq!(api.calls()[1], (role_id, vec![p2.id]));
        assert_eq!(confirmed, [p2.id].into_iter().collect());
    }

    #[tokio::test]
    async fn test_different_roles_do_not_block_each_other() {
        let p1 = perm("orders:read");
        let waiter = Role::new(Uuid::new_v4(), RoleName::Waiter);
        let cashier = Role::new(Uuid::new_v4(), RoleName::Cashier);
        let (w, c) = (waiter.id, cashier.id);
        let api = Arc::new(GatedApi::new(vec![waiter, cashier], vec![p1.clone()], false));
        let service = Arc::new(PermissionMatrixService::new(Arc::clone(&api), Notifier::new(8), 50));
        service.load().await.unwrap();

        let a = service.spawn_toggle(w, p1.id);
        let b = service.spawn_toggle(c, p1.id);
        api.wait_for_calls(2).await;
        assert!(service.is_pending(w) && service.is_pending(c));

        api.gate.add_permits(2);
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert!(!service.is_pending(w) && !service.is_pending(c));
    }

    #[tokio::test]
    async fn test_dropped_view_does_not_break_completion() {
        let p1 = perm("orders:read");
        let role = Role::new(Uuid::new_v4(), RoleName::Waiter);
        let role_id = role.id;
        let api = Arc::new(GatedApi::new(vec![role], vec![p1.clone()], false));
        let service = Arc::new(PermissionMatrixService::new(Arc::clone(&api), Notifier::new(8), 50));
        service.load().await.unwrap();

        drop(service.spawn_toggle(role_id, p1.id));
        api.wait_for_calls(1).await;
        api.gate.add_permits(1);

        tokio::time::timeout(Duration::from_secs(2), async {
            while service.is_pending(role_id) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(service.phase(role_id).unwrap(), MutationPhase::Committed);
    }

    #[tokio::test]
    async fn test_reload_keeps_pending_role_local_state() {
        let p1 = perm("orders:read");
        let role = Role::new(Uuid::new_v4(), RoleName::Waiter);
        let role_id = role.id;
        let api = Arc::new(GatedApi::new(vec![role], vec![p1.clone()], false));
        let service = Arc::new(PermissionMatrixService::new(Arc::clone(&api), Notifier::new(8), 50));
        service.load().await.unwrap();

        let handle = service.spawn_toggle(role_id, p1.id);
        api.wait_for_calls(1).await;
        service.load().await.unwrap();
        assert_eq!(service.displayed_permissions(role_id).unwrap(), [p1.id].into_iter().collect());

        api.gate.add_permits(1);
        handle.await.unwrap().unwrap();
        service.load().await.unwrap();
        assert!(service.displayed_permissions(role_id).unwrap().is_empty());
    }
}
