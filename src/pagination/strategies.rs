//! Pagination strategy implementations

use super::types::{PageEnvelope, PageParams, PaginationState, Paginator};
use serde_json::Value;

/// Default number of records per request
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination driven by the server's `totalPages`
///
/// Requests `?page=N&size=S&sort=...` plus any fixed filters. The loop
/// bound is re-read from every response rather than trusted from the
/// first one.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// Query parameter name for page size
    pub page_size_param: String,
    /// Page size value
    pub page_size: u32,
    /// Sort expression, e.g. `updatedAt,ASC`
    pub sort: Option<String>,
    /// Parameters sent unchanged with every page
    pub fixed_params: PageParams,
}

impl Default for PageNumberPaginator {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            page_size_param: "size".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            fixed_params: PageParams::new(),
        }
    }
}

impl PageNumberPaginator {
    /// Create a paginator with the default `page`/`size` parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sort expression
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Add a parameter sent with every page
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_params.insert(key.into(), value.into());
        self
    }
}

impl Paginator for PageNumberPaginator {
    fn request_params(&self, state: &PaginationState) -> PageParams {
        let mut params = self.fixed_params.clone();
        params.insert(self.page_param.clone(), state.page.to_string());
        params.insert(self.page_size_param.clone(), self.page_size.to_string());
        if let Some(sort) = &self.sort {
            params.insert("sort".to_string(), sort.clone());
        }
        params
    }

    fn process_response(&self, body: &Value, records_count: usize, state: &mut PaginationState) {
        state.add_fetched(records_count as u64);

        let envelope = PageEnvelope::from_response(body);
        state.total_pages = envelope.total_pages;
        state.total_elements = envelope.total_elements;
        state.next_page();

        if state.page >= state.total_pages {
            state.mark_done();
        }
    }
}
