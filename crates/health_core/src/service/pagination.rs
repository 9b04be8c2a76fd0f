//! Keyset pagination result shape.

use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of items plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetPagedResult<T> {
    pub items: Vec<T>,
    pub page_size: u32,
    pub next_key: Option<Uuid>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub count: usize,
}

impl<T> KeysetPagedResult<T> {
    /// Builds a page from up to `page_size + 1` fetched items.
    ///
    /// An item beyond `page_size` is a sentinel: it is dropped and marks that
    /// a next page exists, whose cursor is the last kept item's key.
    pub fn create(
        mut items: Vec<T>,
        page_size: u32,
        key_selector: impl Fn(&T) -> Uuid,
        has_previous_page: bool,
    ) -> Self {
        let limit = page_size as usize;
        let has_next_page = items.len() > limit;
        if has_next_page {
            items.truncate(limit);
        }

        let next_key = if has_next_page {
            items.last().map(&key_selector)
        } else {
            None
        };

        Self {
            count: items.len(),
            items,
            page_size,
            next_key,
            has_next_page,
            has_previous_page,
        }
    }

    /// Maps items while keeping the cursor metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> KeysetPagedResult<U> {
        KeysetPagedResult {
            items: self.items.into_iter().map(f).collect(),
            page_size: self.page_size,
            next_key: self.next_key,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
            count: self.count,
        }
    }
}
