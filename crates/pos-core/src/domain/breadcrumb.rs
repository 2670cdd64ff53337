// ============================================================================
// POS Core - Breadcrumb Entities
// File: crates/pos-core/src/domain/breadcrumb.rs
// Description: Breadcrumb items and the static exact-path rule table
// ============================================================================

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use pos_shared::constants::{HOME_LABEL, HOME_PATH};

/// One crumb of a navigation trail. `path: None` marks the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub label: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Cow<'static, str>>,
}

impl BreadcrumbItem {
    pub const fn link(label: &'static str, path: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
            path: Some(Cow::Borrowed(path)),
        }
    }

    pub const fn current(label: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
            path: None,
        }
    }

    /// Current-page crumb with a label built at resolution time.
    pub fn current_owned(label: String) -> Self {
        Self {
            label: Cow::Owned(label),
            path: None,
        }
    }

    pub const fn home() -> Self {
        Self::link(HOME_LABEL, HOME_PATH)
    }

    pub fn is_link(&self) -> bool {
        self.path.is_some()
    }
}

/// Exact-path to trail mapping.
#[derive(Debug, Clone, Copy)]
pub struct BreadcrumbRule {
    pub path: &'static str,
    pub items: &'static [BreadcrumbItem],
}

const HOME: BreadcrumbItem = BreadcrumbItem::home();
const MENU: BreadcrumbItem = BreadcrumbItem::link("Menú", "/menu");

pub static BREADCRUMB_RULES: &[BreadcrumbRule] = &[
    BreadcrumbRule {
        path: "/dashboard",
        items: &[BreadcrumbItem::current(HOME_LABEL)],
    },
    BreadcrumbRule {
        path: "/tables",
        items: &[HOME, BreadcrumbItem::current("Mesas")],
    },
    BreadcrumbRule {
        path: "/orders",
        items: &[HOME, BreadcrumbItem::current("Pedidos")],
    },
    BreadcrumbRule {
        path: "/pos",
        items: &[HOME, BreadcrumbItem::current("Terminal de venta")],
    },
    BreadcrumbRule {
        path: "/kitchen",
        items: &[HOME, BreadcrumbItem::current("Cocina")],
    },
    BreadcrumbRule {
        path: "/menu",
        items: &[HOME, BreadcrumbItem::current("Menú")],
    },
    BreadcrumbRule {
        path: "/menu/items",
        items: &[HOME, MENU, BreadcrumbItem::current("Productos")],
    },
    BreadcrumbRule {
        path: "/menu/categories",
        items: &[HOME, MENU, BreadcrumbItem::current("Categorías")],
    },
    BreadcrumbRule {
        path: "/menu/stock",
        items: &[HOME, MENU, BreadcrumbItem::current("Inventario")],
    },
    BreadcrumbRule {
        path: "/users",
        items: &[HOME, BreadcrumbItem::current("Usuarios")],
    },
    BreadcrumbRule {
        path: "/roles",
        items: &[HOME, BreadcrumbItem::current("Roles y permisos")],
    },
    BreadcrumbRule {
        path: "/settings",
        items: &[HOME, BreadcrumbItem::current("Configuración")],
    },
    BreadcrumbRule {
        path: "/profile",
        items: &[HOME, BreadcrumbItem::current("Mi perfil")],
    },
];
