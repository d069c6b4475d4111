//! Pagination module
//!
//! # Overview
//!
//! Porter wraps every collection response in a page envelope
//! (`page.number`, `page.totalPages`, `page.totalElements`). The
//! page-number strategy requests zero-based pages until the page index
//! reaches the most recently reported total.

mod strategies;
mod types;

pub use strategies::{PageNumberPaginator, DEFAULT_PAGE_SIZE};
pub use types::{page_content, PageEnvelope, PageParams, PaginationState, Paginator};
