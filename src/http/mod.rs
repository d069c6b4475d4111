//! HTTP client module
//!
//! Provides an HTTP client with bounded retries and backoff.
//!
//! # Features
//!
//! - **Bounded Retries**: five attempts by default, exponential backoff
//! - **Error Classification**: 4xx gives up at once, 5xx and transport errors retry
//! - **Rate Limiting**: optional token bucket using governor
//! - **Request Logging**: every request and response status is logged

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
