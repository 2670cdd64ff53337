// ============================================================================
// POS Core - Permission Entity
// File: crates/pos-core/src/domain/permission.rs
// Description: Fine-grained "<module>:<action>" capabilities
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Permission entity, owned by the permissions service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Permission {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Permission name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl Permission {
    pub fn new(
        id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let permission = Self {
            id,
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
        };

        permission.validate()?;
        Ok(permission)
    }

    /// Substring before `:`, or the whole name when there is none.
    pub fn module(&self) -> &str {
        self.name.split_once(':').map_or(self.name.as_str(), |(module, _)| module)
    }

    pub fn action(&self) -> Option<&str> {
        self.name.split_once(':').map(|(_, action)| action)
    }
}

/// Permissions sharing a module prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGroup {
    pub module: String,
    pub permissions: Vec<Permission>,
}

/// Groups by module. Modules come out sorted; permissions keep server order.
pub fn group_by_module(permissions: &[Permission]) -> Vec<PermissionGroup> {
    let mut groups: Vec<PermissionGroup> = Vec::new();
    for permission in permissions {
        let module = permission.module();
        match groups.iter().position(|g| g.module == module) {
            Some(idx) => groups[idx].permissions.push(permission.clone()),
            None => groups.push(PermissionGroup {
                module: module.to_string(),
                permissions: vec![permission.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| a.module.cmp(&b.module));
    groups
}
