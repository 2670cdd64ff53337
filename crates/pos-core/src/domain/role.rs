// ============================================================================
// POS Core - Role Entity
// File: crates/pos-core/src/domain/role.rs
// Description: Role names, roles with permission assignments, and the
//              wire shapes roles arrive in
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role name tag, owned by the auth service.
///
/// Names the client does not know are carried as `Other` so they still take
/// part in navigation filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleName {
    SuperAdmin,
    Admin,
    Manager,
    Waiter,
    KitchenManager,
    Cashier,
    Other(String),
}

impl RoleName {
    pub fn as_str(&self) -> &str {
        match self {
            RoleName::SuperAdmin => "SUPERADMIN",
            RoleName::Admin => "ADMIN",
            RoleName::Manager => "MANAGER",
            RoleName::Waiter => "WAITER",
            RoleName::KitchenManager => "KITCHEN_MANAGER",
            RoleName::Cashier => "CASHIER",
            RoleName::Other(name) => name,
        }
    }

    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "SUPERADMIN" | "SUPER_ADMIN" => RoleName::SuperAdmin,
            "ADMIN" => RoleName::Admin,
            "MANAGER" => RoleName::Manager,
            "WAITER" => RoleName::Waiter,
            "KITCHEN_MANAGER" => RoleName::KitchenManager,
            "CASHIER" => RoleName::Cashier,
            _ => RoleName::Other(upper),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, RoleName::SuperAdmin)
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        RoleName::parse(&s)
    }
}

impl From<RoleName> for String {
    fn from(name: RoleName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link between a role and one permission. The permission body is only
/// present when the API expands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionAssignment {
    #[serde(alias = "permission_id")]
    pub permission_id: Uuid,
    #[serde(default)]
    pub permission: Option<super::Permission>,
}

/// Canonical role shape used by every service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionAssignment>,
}

impl Role {
    pub fn new(id: Uuid, name: RoleName) -> Self {
        Self {
            id,
            name,
            description: None,
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.permissions = ids
            .into_iter()
            .map(|permission_id| PermissionAssignment { permission_id, permission: None })
            .collect();
        self
    }

    pub fn is_super_admin(&self) -> bool {
        self.name.is_super_admin()
    }

    /// Derived set used by the matrix and by the next mutation payload.
    pub fn assigned_permission_ids(&self) -> BTreeSet<Uuid> {
        self.permissions.iter().map(|a| a.permission_id).collect()
    }

    /// Names of expanded permissions; assignments without a body are skipped.
    pub fn permission_names(&self) -> BTreeSet<String> {
        self.permissions
            .iter()
            .filter_map(|a| a.permission.as_ref().map(|p| p.name.clone()))
            .collect()
    }
}

/// User-to-role link as returned by user-centric endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub role: Role,
}

/// The two shapes a role can arrive in. Resolved once at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleAssignment {
    Wrapped(UserRole),
    Direct(Role),
}

impl RoleAssignment {
    pub fn role(&self) -> &Role {
        match self {
            RoleAssignment::Wrapped(user_role) => &user_role.role,
            RoleAssignment::Direct(role) => role,
        }
    }

    pub fn into_role(self) -> Role {
        match self {
            RoleAssignment::Wrapped(user_role) => user_role.role,
            RoleAssignment::Direct(role) => role,
        }
    }
}

impl From<RoleAssignment> for Role {
    fn from(assignment: RoleAssignment) -> Self {
        assignment.into_role()
    }
}
