//! Pagination types and traits
//!
//! Defines the core pagination abstractions and the Porter page envelope.

use serde_json::Value;
use std::collections::BTreeMap;

/// Query parameters for one page request
pub type PageParams = BTreeMap<String, String>;

/// Pagination metadata returned alongside each page of content
///
/// ```json
/// {"content": [...], "page": {"size": 10, "totalElements": 42, "totalPages": 5, "number": 0}}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEnvelope {
    /// Zero-based index of this page
    pub number: u32,
    /// Page size the server applied
    pub size: u32,
    /// Total pages for the query
    pub total_pages: u32,
    /// Total elements for the query
    pub total_elements: u64,
}

impl Default for PageEnvelope {
    fn default() -> Self {
        Self {
            number: 0,
            size: 0,
            total_pages: 1,
            total_elements: 0,
        }
    }
}

impl PageEnvelope {
    /// Read the envelope from a response body
    ///
    /// A body without a `page` object describes a single page.
    pub fn from_response(body: &Value) -> Self {
        let Some(page) = body.get("page") else {
            return Self::default();
        };
        let defaults = Self::default();

        Self {
            number: read_u32(page, "number").unwrap_or(defaults.number),
            size: read_u32(page, "size").unwrap_or(defaults.size),
            total_pages: read_u32(page, "totalPages").unwrap_or(defaults.total_pages),
            total_elements: read_u64(page, "totalElements").unwrap_or(defaults.total_elements),
        }
    }
}

fn read_u64(page: &Value, key: &str) -> Option<u64> {
    match page.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_u32(page: &Value, key: &str) -> Option<u32> {
    read_u64(page, key).map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Items of a page, in server order
pub fn page_content(body: &Value) -> &[Value] {
    body.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Next page to request (zero-based)
    pub page: u32,
    /// Total pages, as last reported by the server
    pub total_pages: u32,
    /// Total elements, as last reported by the server
    pub total_elements: u64,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 0,
            // Sentinel until the first response arrives
            total_pages: 1,
            total_elements: 0,
            total_fetched: 0,
            done: false,
        }
    }
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether another page should be requested
    pub fn has_next(&self) -> bool {
        !self.done && self.page < self.total_pages
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the page described by `state`
    fn request_params(&self, state: &PaginationState) -> PageParams;

    /// Advance `state` past the page in `body`
    fn process_response(&self, body: &Value, records_count: usize, state: &mut PaginationState);
}
