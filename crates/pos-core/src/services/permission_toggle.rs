//! Permission matrix checkbox flip

use std::collections::BTreeSet;

use uuid::Uuid;

/// Next complete permission set for a role after one checkbox flips.
///
/// The result is meant to be submitted whole, never as a delta.
pub fn toggle_permission(current: &BTreeSet<Uuid>, permission_id: Uuid, is_assigned: bool) -> BTreeSet<Uuid> {
    let mut next = current.clone();
    if is_assigned {
        next.remove(&permission_id);
    } else {
        next.insert(permission_id);
    }
    next
}
