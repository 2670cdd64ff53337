//! Wire shapes that only exist at the API boundary

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pos_core::domain::{CurrentUser, Role, RoleAssignment, RoleName};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionsRequest {
    pub permission_ids: Vec<Uuid>,
}

/// Error body, `{ "message": ... }` or `{ "error": ... }`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn text(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Single-role response, bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoleResponse {
    Enveloped { data: RoleAssignment },
    Bare(RoleAssignment),
}

impl RoleResponse {
    pub fn into_role(self) -> Role {
        match self {
            RoleResponse::Enveloped { data } => data.into_role(),
            RoleResponse::Bare(assignment) => assignment.into_role(),
        }
    }
}

/// A user's role, given either by name or as a full role object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserRoleRef {
    Name(String),
    Assignment(RoleAssignment),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<UserRoleRef>,
}

impl From<MeResponse> for CurrentUser {
    fn from(me: MeResponse) -> Self {
        let mut roles = Vec::new();
        let mut names: Vec<RoleName> = Vec::new();
        for role_ref in me.roles {
            match role_ref {
                UserRoleRef::Name(name) => {
                    let name = RoleName::parse(&name);
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                UserRoleRef::Assignment(assignment) => roles.push(assignment.into_role()),
            }
        }

        let mut user = CurrentUser::from_roles(me.id, me.display_name, me.email, &roles);
        for name in names {
            if !user.roles.contains(&name) {
                user.roles.push(name);
            }
        }
        user
    }
}
