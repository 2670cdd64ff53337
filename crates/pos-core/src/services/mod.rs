//! Domain services (navigation and access logic)

pub mod breadcrumb_resolver;
pub mod navigation_filter;
pub mod notifications;
pub mod pagination;
pub mod permission_matrix;
pub mod permission_toggle;
pub mod role_mutation;
pub mod session;
pub mod sidebar;

pub use breadcrumb_resolver::{resolve_breadcrumbs, BreadcrumbResolver};
pub use navigation_filter::{filter_navigation, is_visible};
pub use notifications::{Notification, NotificationLevel, Notifier};
pub use pagination::{fetch_all, page_window};
pub use permission_matrix::{PermissionMatrix, PermissionMatrixService};
pub use permission_toggle::toggle_permission;
pub use role_mutation::{MutationPhase, RoleMutation};
pub use session::SessionContext;
pub use sidebar::{SidebarKeys, SidebarPreferences};
