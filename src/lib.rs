// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # revinate-tap
//!
//! Incremental extraction connector for the Revinate Porter hotel-review
//! API.
//!
//! ## Features
//!
//! - **Signed Requests**: HMAC-SHA256 Porter credential headers
//! - **Page Number Pagination**: `page`/`size`/`sort` with the server's `totalPages`
//! - **Incremental Reviews**: `updatedAt` window bounded by a persisted cursor
//! - **Flat Rows**: nested JSON flattened into fixed per-stream columns
//! - **Line Protocol**: schema, record and state messages as JSON lines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use revinate_tap::{SingerSink, SyncEngine, TapConfig, TapState};
//!
//! #[tokio::main]
//! async fn main() -> revinate_tap::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let mut engine = SyncEngine::from_tap_config(&config)?;
//!
//!     let mut sink = SingerSink::stdout();
//!     let state = engine.run(&mut sink, &TapState::new()).await?;
//!     println!("next cursor: {:?}", state.last_update);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         SyncEngine                           │
//! │  hotels (+ reviews snapshot per hotel)  →  reviews  →  state │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬──────────┐
//! │   Auth   │   HTTP    │   Paginate    │  Flatten  │   Sink   │
//! ├──────────┼───────────┼───────────────┼───────────┼──────────┤
//! │ HMAC     │ Retry     │ Page Number   │ Links→ids │ Singer   │
//! │ Headers  │ Backoff   │ totalPages    │ Sub-objs  │ Memory   │
//! │          │ Rate Limit│               │ _json     │          │
//! └──────────┴───────────┴───────────────┴───────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Porter request signing
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Nested JSON to flat rows
pub mod flatten;

/// Cursor state
pub mod state;

/// Stream schemas
pub mod schema;

/// Output sinks
pub mod sink;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::TapConfig;
pub use engine::{SyncConfig, SyncEngine, SyncStats};
pub use schema::Stream;
pub use sink::{MemorySink, Message, SingerSink, Sink};
pub use state::TapState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
