//! Role-based filtering of the sidebar

use crate::domain::{NavigationItem, RoleName};

/// An item is visible when it has no role restriction or shares at least
/// one role with the caller.
pub fn is_visible(item: &NavigationItem, roles: &[RoleName]) -> bool {
    match &item.allowed_roles {
        None => true,
        Some(allowed) if allowed.is_empty() => true,
        Some(allowed) => allowed.iter().any(|r| roles.contains(r)),
    }
}

/// Visible items in declaration order. Children are filtered with the same rule.
pub fn filter_navigation(items: &[NavigationItem], roles: &[RoleName]) -> Vec<NavigationItem> {
    items
        .iter()
        .filter(|item| is_visible(item, roles))
        .map(|item| NavigationItem {
            children: filter_navigation(&item.children, roles),
            ..item.clone()
        })
        .collect()
}
