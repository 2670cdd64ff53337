//! Sidebar collapse / expanded-node preferences

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use pos_shared::constants::{SIDEBAR_COLLAPSED_KEY, SIDEBAR_EXPANDED_KEY};

use crate::error::DomainError;
use crate::repositories::PreferenceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarKeys {
    pub collapsed: String,
    pub expanded: String,
}

impl Default for SidebarKeys {
    fn default() -> Self {
        Self {
            collapsed: SIDEBAR_COLLAPSED_KEY.to_string(),
            expanded: SIDEBAR_EXPANDED_KEY.to_string(),
        }
    }
}

/// Read once at startup, written through on every toggle.
pub struct SidebarPreferences<S: PreferenceStore + ?Sized> {
    store: Arc<S>,
    keys: SidebarKeys,
    collapsed: bool,
    expanded: BTreeSet<String>,
}

impl<S: PreferenceStore + ?Sized> SidebarPreferences<S> {
    /// Missing or unreadable values fall back to not collapsed / nothing expanded.
    pub fn load(store: Arc<S>, keys: SidebarKeys) -> Self {
        let collapsed = match store.get(&keys.collapsed) {
            Ok(Some(raw)) => raw.trim() == "true",
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read {}: {}", keys.collapsed, e);
                false
            }
        };

        let expanded = match store.get(&keys.expanded) {
            Ok(Some(raw)) => serde_json::from_str::<BTreeSet<String>>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", keys.expanded, e);
                BTreeSet::new()
            }),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", keys.expanded, e);
                BTreeSet::new()
            }
        };

        debug!("Sidebar loaded (collapsed: {}, expanded: {})", collapsed, expanded.len());
        Self {
            store,
            keys,
            collapsed,
            expanded,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, node: &str) -> bool {
        self.expanded.contains(node)
    }

    pub fn set_collapsed(&mut self, collapsed: bool) -> Result<(), DomainError> {
        self.store
            .set(&self.keys.collapsed, if collapsed { "true" } else { "false" })?;
        self.collapsed = collapsed;
        Ok(())
    }

    /// Returns the new collapsed state.
    pub fn toggle_collapsed(&mut self) -> Result<bool, DomainError> {
        self.set_collapsed(!self.collapsed)?;
        Ok(self.collapsed)
    }

    /// Returns whether `node` is expanded afterwards.
    pub fn toggle_expanded(&mut self, node: &str) -> Result<bool, DomainError> {
        let mut next = self.expanded.clone();
        let now_expanded = if next.remove(node) {
            false
        } else {
            next.insert(node.to_string());
            true
        };
        let raw = serde_json::to_string(&next).map_err(|e| DomainError::StorageError(e.to_string()))?;
        self.store.set(&self.keys.expanded, &raw)?;
        self.expanded = next;
        Ok(now_expanded)
    }
}
