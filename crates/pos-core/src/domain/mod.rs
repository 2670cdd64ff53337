//! # POS Core - Domain Module
//! 
//! Entities consumed by the navigation and permission services.

pub mod breadcrumb;
pub mod navigation;
pub mod permission;
pub mod role;
pub mod user;

// Re-export all entities and enums
pub use breadcrumb::{BreadcrumbItem, BreadcrumbRule, BREADCRUMB_RULES};
pub use navigation::{default_navigation, NavigationItem};
pub use permission::{group_by_module, Permission, PermissionGroup};
pub use role::{PermissionAssignment, Role, RoleAssignment, RoleName, UserRole};
pub use user::CurrentUser;
