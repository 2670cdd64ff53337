// ============================================================================
// POS Core - Navigation Item Entity
// File: crates/pos-core/src/domain/navigation.rs
// Description: Sidebar navigation entries and their role restrictions
// ============================================================================

use serde::{Deserialize, Serialize};

use super::role::RoleName;

/// Sidebar entry.
///
/// `allowed_roles` of `None` or an empty list both mean the entry is visible
/// to any authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub name: String,
    pub path: String,
    pub icon: String,
    #[serde(default)]
    pub allowed_roles: Option<Vec<RoleName>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationItem>,
}

impl NavigationItem {
    pub fn new(name: &str, path: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            icon: icon.to_string(),
            allowed_roles: None,
            description: None,
            children: Vec::new(),
        }
    }

    pub fn roles(mut self, roles: &[RoleName]) -> Self {
        self.allowed_roles = Some(roles.to_vec());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn child(mut self, item: NavigationItem) -> Self {
        self.children.push(item);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed_roles.as_ref().map_or(true, |roles| roles.is_empty())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The sidebar as shipped with the client.
pub fn default_navigation() -> Vec<NavigationItem> {
    use RoleName::*;

    vec![
        NavigationItem::new("Dashboard", "/dashboard", "layout-dashboard")
            .describe("Resumen del día"),
        NavigationItem::new("Mesas", "/tables", "armchair")
            .roles(&[SuperAdmin, Admin, Manager, Waiter])
            .describe("Mapa de mesas y ocupación"),
        NavigationItem::new("Pedidos", "/orders", "receipt")
            .roles(&[SuperAdmin, Admin, Manager, Waiter, Cashier]),
        NavigationItem::new("Terminal de venta", "/pos", "calculator")
            .roles(&[SuperAdmin, Admin, Cashier, Waiter]),
        NavigationItem::new("Cocina", "/kitchen", "chef-hat")
            .roles(&[SuperAdmin, Admin, KitchenManager]),
        NavigationItem::new("Menú", "/menu", "book-open")
            .roles(&[SuperAdmin, Admin, Manager, KitchenManager])
            .child(NavigationItem::new("Productos", "/menu/items", "utensils"))
            .child(NavigationItem::new("Categorías", "/menu/categories", "tags"))
            .child(
                NavigationItem::new("Inventario", "/menu/stock", "package")
                    .roles(&[SuperAdmin, Admin, KitchenManager]),
            ),
        NavigationItem::new("Usuarios", "/users", "users")
            .roles(&[SuperAdmin, Admin]),
        NavigationItem::new("Roles y permisos", "/roles", "shield")
            .roles(&[SuperAdmin, Admin]),
        NavigationItem::new("Configuración", "/settings", "settings")
            .roles(&[SuperAdmin]),
    ]
}
