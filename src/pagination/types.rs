//! Pagination types and the continuation rule

use crate::decode::{get_path, is_truthy};
use crate::types::{JsonValue, StringMap};

/// Page number requested after the first page
pub type PageToken = u32;

/// Fixed page size for every list endpoint
pub const PAGE_SIZE: u32 = 25;

/// Query parameter for the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter for the page size
pub const SIZE_PARAM: &str = "size";

/// Continuation flag in every list response
pub const HAS_NEXT_PATH: &str = "pages.hasNext";

/// Base query parameters: `size` always, `page` only after the first page
pub fn page_params(previous_token: Option<PageToken>) -> StringMap {
    let mut params = StringMap::new();
    if let Some(page) = previous_token {
        params.insert(PAGE_PARAM.to_string(), page.to_string());
    }
    params.insert(SIZE_PARAM.to_string(), PAGE_SIZE.to_string());
    params
}

/// Next page token, or `None` when `pages.hasNext` is falsy or absent.
///
/// The first page is implicitly page 1, so the first token handed out is 2.
pub fn next_page_token(body: &JsonValue, previous_token: Option<PageToken>) -> Option<PageToken> {
    let has_next = get_path(body, HAS_NEXT_PATH).is_some_and(is_truthy);
    if has_next {
        Some(previous_token.unwrap_or(1).saturating_add(1))
    } else {
        None
    }
}

/// Tracks pagination progress for one stream run
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Token for the next request (`None` = first page)
    pub token: Option<PageToken>,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Records parsed so far
    pub records_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and the token it produced
    pub fn advance(&mut self, records: usize, next: Option<PageToken>) {
        self.pages_fetched += 1;
        self.records_fetched += records as u64;
        match next {
            Some(token) => self.token = Some(token),
            None => self.done = true,
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}
