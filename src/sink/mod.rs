//! Output sinks
//!
//! The orchestrator writes through the [`Sink`] trait. [`SingerSink`]
//! serializes each message as one JSON line; [`MemorySink`] keeps them in
//! memory for inspection.

mod memory;
mod singer;
mod types;

pub use memory::MemorySink;
pub use singer::SingerSink;
pub use types::Message;

use crate::error::Result;
use crate::schema::JsonSchema;
use crate::types::{FlatRecord, JsonValue};

/// Destination for schema, record and state messages
pub trait Sink {
    /// Declare a stream's schema and primary key columns
    fn declare_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[&str],
    ) -> Result<()>;

    /// Emit one flattened row for a declared stream
    fn emit_record(&mut self, stream: &str, record: FlatRecord) -> Result<()>;

    /// Emit the resumable cursor state
    fn emit_state(&mut self, state: &JsonValue) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
