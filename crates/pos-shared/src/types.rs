//! Common types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, super::constants::MAX_PAGE_SIZE),
        }
    }

    /// `None` once the page number would overflow.
    pub fn next(&self) -> Option<Self> {
        Some(Self { page: self.page.checked_add(1)?, per_page: self.per_page })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: super::constants::DEFAULT_PAGE_SIZE }
    }
}

/// Paging metadata returned alongside every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// List envelope: `{ "data": [...], "meta": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
