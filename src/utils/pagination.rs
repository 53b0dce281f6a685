//! Windowed page-number sequences for the activity table pager.

use serde::{Serialize, Serializer};

/// Pages shown on each side of the current page.
pub const PAGE_WINDOW_DELTA: u32 = 2;

/// One slot in the pager: either a page number or an ellipsis gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u32(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Compute the windowed page sequence for a pager.
///
/// The first and last pages are always visible, plus `delta` pages on each
/// side of the current page, with ellipses marking any gap. A single page
/// (or none) yields an empty sequence: the pager is non-interactive.
pub fn page_window(current: u32, total_pages: u32, delta: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);

    let low = current.saturating_sub(delta).max(1);
    let high = (current + delta).min(total_pages);

    let mut pages: Vec<u32> = Vec::new();
    pages.push(1);
    pages.extend(low..=high);
    pages.push(total_pages);
    pages.sort_unstable();
    pages.dedup();

    let mut window = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if let Some(prev) = previous {
            if page - prev > 1 {
                window.push(PageItem::Ellipsis);
            }
        }
        window.push(PageItem::Page(page));
        previous = Some(page);
    }
    window
}
