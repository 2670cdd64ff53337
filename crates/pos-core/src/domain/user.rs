//! Authenticated user as seen by the client

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{Role, RoleName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub roles: Vec<RoleName>,
    /// Permission names granted through any of the user's roles.
    pub permissions: BTreeSet<String>,
}

impl CurrentUser {
    pub fn new(id: Uuid, display_name: String, roles: Vec<RoleName>) -> Self {
        Self {
            id,
            display_name,
            email: None,
            roles,
            permissions: BTreeSet::new(),
        }
    }

    /// Builds the user from fully resolved roles, collecting their permission names.
    pub fn from_roles(id: Uuid, display_name: String, email: Option<String>, roles: &[Role]) -> Self {
        let mut names = Vec::with_capacity(roles.len());
        let mut permissions = BTreeSet::new();
        for role in roles {
            if !names.contains(&role.name) {
                names.push(role.name.clone());
            }
            permissions.extend(role.permission_names());
        }
        Self {
            id,
            display_name,
            email,
            roles: names,
            permissions,
        }
    }

    pub fn has_role(&self, role: &RoleName) -> bool {
        self.roles.contains(role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.roles.iter().any(RoleName::is_super_admin)
    }

    /// `module:action` check; super-admins pass every check.
    pub fn has_permission(&self, name: &str) -> bool {
        self.is_super_admin() || self.permissions.contains(name)
    }
}
