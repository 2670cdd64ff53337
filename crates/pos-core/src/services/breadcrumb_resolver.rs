// ============================================================================
// POS Core - Breadcrumb Resolver
// File: crates/pos-core/src/services/breadcrumb_resolver.rs
// ============================================================================
//! Maps the current URL path to a navigation trail.
//!
//! Exact paths come from the static rule table. ID-bearing routes are built
//! per top-level segment. Anything else resolves to the home crumb alone.

use crate::domain::{BreadcrumbItem, BreadcrumbRule, BREADCRUMB_RULES};

#[derive(Debug, Clone, Copy)]
pub struct BreadcrumbResolver {
    rules: &'static [BreadcrumbRule],
}

impl Default for BreadcrumbResolver {
    fn default() -> Self {
        Self::new(BREADCRUMB_RULES)
    }
}

impl BreadcrumbResolver {
    pub fn new(rules: &'static [BreadcrumbRule]) -> Self {
        Self { rules }
    }

    /// Total over every input; the result is never empty.
    pub fn resolve(&self, path: &str) -> Vec<BreadcrumbItem> {
        let normalized = normalize(path);

        if let Some(rule) = self.rules.iter().find(|r| r.path == normalized) {
            return rule.items.to_vec();
        }

        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(trail) = resolve_dynamic(&segments) {
            return trail;
        }

        vec![BreadcrumbItem::home()]
    }
}

/// Resolves with the built-in rule table.
pub fn resolve_breadcrumbs(path: &str) -> Vec<BreadcrumbItem> {
    BreadcrumbResolver::default().resolve(path)
}

/// Strips one trailing `/`; empty becomes `/`.
fn normalize(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn resolve_dynamic(segments: &[&str]) -> Option<Vec<BreadcrumbItem>> {
    let first = *segments.first()?;
    let second = segments.get(1).copied();
    let third = segments.get(2).copied();
    let fourth = segments.get(3).copied();

    match first {
        "tables" if segments.len() >= 2 => {
            let id = segments[1];
            let last = if id == "new" {
                BreadcrumbItem::current("Nueva mesa")
            } else {
                BreadcrumbItem::current_owned(format!("Mesa {}", id))
            };
            Some(vec![
                BreadcrumbItem::home(),
                BreadcrumbItem::link("Mesas", "/tables"),
                last,
            ])
        }
        "orders" if segments.len() >= 2 => {
            let id = segments[1];
            let mut trail = vec![
                BreadcrumbItem::home(),
                BreadcrumbItem::link("Pedidos", "/orders"),
            ];
            if id == "new" {
                trail.push(BreadcrumbItem::current("Nuevo pedido"));
            } else {
                trail.push(BreadcrumbItem::current_owned(format!("Pedido #{}", id)));
                if third == Some("edit") {
                    trail.push(BreadcrumbItem::current("Editar"));
                }
            }
            Some(trail)
        }
        "menu" => {
            let mut trail = vec![
                BreadcrumbItem::home(),
                BreadcrumbItem::link("Menú", "/menu"),
            ];
            match second {
                Some("items") => trail.push(BreadcrumbItem::current(
                    if third == Some("new") {
                        "Nuevo producto"
                    } else if fourth == Some("edit") {
                        "Editar producto"
                    } else {
                        "Productos"
                    },
                )),
                Some("categories") => trail.push(BreadcrumbItem::current(
                    if third == Some("new") {
                        "Nueva categoría"
                    } else if fourth == Some("edit") {
                        "Editar categoría"
                    } else {
                        "Categorías"
                    },
                )),
                Some("stock") => trail.push(BreadcrumbItem::current("Inventario")),
                _ => {}
            }
            Some(trail)
        }
        "users" if segments.len() >= 2 => {
            let mut trail = vec![
                BreadcrumbItem::home(),
                BreadcrumbItem::link("Usuarios", "/users"),
            ];
            // `/users/:id` keeps the bare list trail, unlike tables and orders.
            if segments[1] == "new" {
                trail.push(BreadcrumbItem::current("Nuevo usuario"));
            } else if third == Some("edit") {
                trail.push(BreadcrumbItem::current("Editar usuario"));
            }
            Some(trail)
        }
        _ => None,
    }
}
