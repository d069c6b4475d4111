//! Incremental cursor state
//!
//! The persisted state is a single JSON object whose `last_update` key holds
//! the high-water mark of review `updatedAt` values. Each run derives its
//! review window from it and emits the advanced value when done.

mod cursor;
mod types;

pub use cursor::{HighWaterMark, ReviewWindow, DEFAULT_LOOKBACK_SECS};
pub use types::TapState;
