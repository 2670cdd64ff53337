//! Client-side paging helpers

use std::future::Future;

use tracing::{debug, warn};

use pos_shared::{Page, Pagination};

use crate::error::DomainError;

/// Page numbers shown in a pager: centered on `current`, clamped to
/// `1..=total_pages`, at most `max_visible` long.
pub fn page_window(current: u32, total_pages: u32, max_visible: u32) -> Vec<u32> {
    if total_pages == 0 || max_visible == 0 {
        return Vec::new();
    }
    let len = max_visible.min(total_pages);
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(len / 2).max(1);
    let mut end = start + len - 1;
    if end > total_pages {
        end = total_pages;
        start = end + 1 - len;
    }
    (start..=end).collect()
}

/// Walks a paginated endpoint until the last page. Paging follows the
/// requested page number; a response for a different page ends the walk.
pub async fn fetch_all<T, F, Fut>(per_page: u32, mut fetch: F) -> Result<Vec<T>, DomainError>
where
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<Page<T>, DomainError>>,
{
    let mut page = Pagination::new(1, per_page);
    let mut items = Vec::new();
    loop {
        let batch = fetch(page).await?;
        debug!(
            "Fetched page {}/{} ({} items)",
            page.page, batch.meta.total_pages, batch.data.len()
        );
        if batch.meta.page != page.page {
            warn!(
                "Requested page {} but server returned page {}, stopping",
                page.page, batch.meta.page
            );
            if page.page == 1 {
                items.extend(batch.data);
            }
            break;
        }
        let has_next = page.page < batch.meta.total_pages && !batch.data.is_empty();
        items.extend(batch.data);
        match page.next() {
            Some(next) if has_next => page = next,
            _ => break,
        }
    }
    Ok(items)
}
