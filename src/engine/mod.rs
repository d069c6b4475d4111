//! Execution engine module
//!
//! Sequential sync of the Porter resources.
//!
//! # Overview
//!
//! A run declares every stream schema, then pages through `/hotels`
//! (fetching each hotel's reviews snapshot right after the hotel row is
//! emitted), then pages through `/reviews` inside the cursor window, and
//! finally emits the advanced cursor state.
//!
//! Page fetch failures end that resource's loop early without failing the
//! run. Only sink failures and credential errors abort.

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::auth::{skewed_timestamp, PorterCredentials};
use crate::config::TapConfig;
use crate::error::Result;
use crate::flatten::{
    flatten_hotel, flatten_review, flatten_snapshot, flatten_snapshot_by_site,
    flatten_snapshot_by_time, snapshot_children, SnapshotContext,
};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, RequestConfig};
use crate::pagination::{
    page_content, PageNumberPaginator, PageParams, PaginationState, Paginator,
};
use crate::schema::Stream;
use crate::sink::Sink;
use crate::state::{HighWaterMark, ReviewWindow, TapState};
use crate::types::{unix_now, FlatRecord, StringMap};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Collection endpoint for hotels
pub const HOTELS_PATH: &str = "/hotels";
/// Collection endpoint for reviews
pub const REVIEWS_PATH: &str = "/reviews";

/// Snapshot endpoint of one hotel
pub fn snapshot_path(hotel_id: i64) -> String {
    format!("{HOTELS_PATH}/{hotel_id}/reviewssnapshot")
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// Request signing credentials
    credentials: PorterCredentials,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, credentials: PorterCredentials) -> Self {
        Self {
            client,
            credentials,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Build an engine, and its HTTP client, from a validated tap config
    pub fn from_tap_config(config: &TapConfig) -> Result<Self> {
        let mut http = HttpClientConfig::builder().base_url(&config.base_url);
        if let Some(rps) = config.requests_per_second {
            http = http.rate_limit(RateLimiterConfig::per_second(rps));
        }
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent);
        }

        let client = HttpClient::with_config(http.build())?;
        let engine = Self::new(client, PorterCredentials::from_config(config))
            .with_config(SyncConfig::from_tap_config(config)?);
        Ok(engine)
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run a full sync against the current clock
    pub async fn run<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        state: &TapState,
    ) -> Result<TapState> {
        self.run_at(sink, state, unix_now()).await
    }

    /// Run a full sync as if the clock read `now`
    ///
    /// Returns the state emitted at the end of the run.
    pub async fn run_at<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        state: &TapState,
        now: i64,
    ) -> Result<TapState> {
        let start = Instant::now();

        // Signed once for the whole run; the same instant bounds the review window
        let run_timestamp = skewed_timestamp(now);
        let headers = self.credentials.headers(run_timestamp)?;
        let window = ReviewWindow::compute(state, self.config.start_date, now);

        for stream in Stream::ALL {
            sink.declare_schema(stream.name(), &stream.schema(), stream.key_properties())?;
        }

        self.sync_hotels(sink, &headers).await?;
        let mark = self.sync_reviews(sink, &headers, &window).await?;

        let new_state = state.clone().with_last_update(mark.value());
        sink.emit_state(&new_state.to_json())?;
        sink.flush()?;

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            records = self.stats.total_records(),
            pages = self.stats.pages_fetched,
            errors = self.stats.errors,
            last_update = mark.value(),
            "Sync complete"
        );

        Ok(new_state)
    }

    /// Page through `/hotels`, following each hotel with its snapshot
    async fn sync_hotels<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        headers: &StringMap,
    ) -> Result<()> {
        let paginator = PageNumberPaginator::new()
            .with_page_size(self.config.page_size)
            .with_sort("id,ASC");
        let mut pagination = PaginationState::new();

        while pagination.has_next() {
            info!(
                stream = Stream::Hotels.name(),
                page = pagination.page,
                total_pages = pagination.total_pages,
                "Fetching page"
            );
            let Some(body) = self
                .fetch_page(HOTELS_PATH, &paginator, &pagination, headers)
                .await
            else {
                break;
            };

            let items = page_content(&body);
            for hotel in items {
                let row = flatten_hotel(hotel);
                let hotel_id = int_field(&row, "hotel_id");
                self.emit(sink, Stream::Hotels, row)?;

                if self.config.sync_snapshots {
                    self.sync_snapshot(sink, hotel_id, headers).await?;
                }
            }

            paginator.process_response(&body, items.len(), &mut pagination);
        }

        info!(
            stream = Stream::Hotels.name(),
            records = pagination.total_fetched,
            "Finished stream"
        );
        Ok(())
    }

    /// Fetch one hotel's reviews snapshot and emit it with its children
    ///
    /// A failed fetch skips the hotel.
    async fn sync_snapshot<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        hotel_id: i64,
        headers: &StringMap,
    ) -> Result<()> {
        if hotel_id == 0 {
            warn!("Hotel has no id, skipping reviews snapshot");
            return Ok(());
        }

        let request = request_config(None, headers);
        let snapshot: Value = match self
            .client
            .get_json_with_config(&snapshot_path(hotel_id), request)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.add_error();
                warn!(
                    hotel_id,
                    error = %e,
                    "Failed to fetch reviews snapshot, skipping hotel"
                );
                return Ok(());
            }
        };

        let context = SnapshotContext::from_snapshot(&snapshot, hotel_id);
        self.emit(
            sink,
            Stream::HotelReviewsSnapshot,
            flatten_snapshot(&snapshot, &context),
        )?;
        for site in snapshot_children(&snapshot, "valuesByReviewSite") {
            self.emit(
                sink,
                Stream::HotelReviewsSnapshotBySite,
                flatten_snapshot_by_site(&context, site),
            )?;
        }
        for period in snapshot_children(&snapshot, "valuesByTime") {
            self.emit(
                sink,
                Stream::HotelReviewsSnapshotByTime,
                flatten_snapshot_by_time(&context, period),
            )?;
        }

        info!(hotel_id, "Synced hotel reviews snapshot");
        Ok(())
    }

    /// Page through `/reviews` updated inside `window`
    async fn sync_reviews<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        headers: &StringMap,
        window: &ReviewWindow,
    ) -> Result<HighWaterMark> {
        let paginator = PageNumberPaginator::new()
            .with_page_size(self.config.page_size)
            .with_sort("updatedAt,ASC")
            .with_param("updatedAt", window.updated_at_range());
        let mut pagination = PaginationState::new();
        let mut mark = HighWaterMark::new(window.to_timestamp);

        while pagination.has_next() {
            info!(
                stream = Stream::Reviews.name(),
                page = pagination.page,
                total_pages = pagination.total_pages,
                "Fetching page"
            );
            let Some(body) = self
                .fetch_page(REVIEWS_PATH, &paginator, &pagination, headers)
                .await
            else {
                break;
            };

            let items = page_content(&body);
            for review in items {
                let row = flatten_review(review);
                mark.observe(int_field(&row, "updated_at"));
                self.emit(sink, Stream::Reviews, row)?;
            }

            paginator.process_response(&body, items.len(), &mut pagination);
        }

        if mark.is_empty() {
            debug!(
                to_timestamp = window.to_timestamp,
                "No reviews in window, cursor moves to window end"
            );
        }
        info!(
            stream = Stream::Reviews.name(),
            records = pagination.total_fetched,
            "Finished stream"
        );
        Ok(mark)
    }

    /// Fetch one page; failures are logged and yield `None`
    async fn fetch_page(
        &mut self,
        path: &str,
        paginator: &PageNumberPaginator,
        pagination: &PaginationState,
        headers: &StringMap,
    ) -> Option<Value> {
        let params = paginator.request_params(pagination);
        let request = request_config(Some(&params), headers);

        match self.client.get_json_with_config::<Value>(path, request).await {
            Ok(body) => {
                self.stats.add_page();
                Some(body)
            }
            Err(e) => {
                self.stats.add_error();
                error!(
                    path,
                    page = pagination.page,
                    error = %e,
                    "Page fetch failed, ending stream early"
                );
                None
            }
        }
    }

    fn emit<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        stream: Stream,
        row: FlatRecord,
    ) -> Result<()> {
        sink.emit_record(stream.name(), row)?;
        self.stats.add_record(stream);
        Ok(())
    }
}

fn request_config(params: Option<&PageParams>, headers: &StringMap) -> RequestConfig {
    let mut request = RequestConfig::new();
    for (key, value) in params.into_iter().flatten() {
        request = request.query(key, value);
    }
    for (key, value) in headers {
        request = request.header(key, value);
    }
    request
}

fn int_field(row: &FlatRecord, key: &str) -> i64 {
    row.get(key).and_then(Value::as_i64).unwrap_or(0)
}
