//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Landing route every breadcrumb trail starts from.
pub const HOME_PATH: &str = "/dashboard";
pub const HOME_LABEL: &str = "Inicio";

pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar-collapsed";
pub const SIDEBAR_EXPANDED_KEY: &str = "sidebar-expanded-menus";

pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;
pub const DEFAULT_API_TIMEOUT_SECONDS: u64 = 15;
