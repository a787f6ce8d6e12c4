//! Pagination module
//!
//! greytHR list endpoints are page-numbered. The first request carries only
//! `size`; every response reports `pages.hasNext`, and while it is truthy
//! the next request asks for the following page number.
//!
//! The token sequence for a three-page listing is `none → 2 → 3 → stop`.

mod types;

pub use types::{
    next_page_token, page_params, PageToken, PaginationState, HAS_NEXT_PATH, PAGE_PARAM,
    PAGE_SIZE, SIZE_PARAM,
};
