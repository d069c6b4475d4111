//! JSON-lines writer

use super::types::Message;
use super::Sink;
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use crate::types::{FlatRecord, JsonValue};
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

/// Writes each message as a single line of JSON
///
/// Records are rejected for streams whose schema has not been declared.
pub struct SingerSink<W: Write> {
    writer: W,
    declared: HashSet<String>,
    records_written: usize,
}

impl SingerSink<std::io::Stdout> {
    /// Sink over the process's standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> SingerSink<W> {
    /// Create a sink over any writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            declared: HashSet::new(),
            records_written: 0,
        }
    }

    /// Whether a stream has been declared
    pub fn is_declared(&self, stream: &str) -> bool {
        self.declared.contains(stream)
    }

    /// Number of record lines written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_message(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Sink for SingerSink<W> {
    fn declare_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[&str],
    ) -> Result<()> {
        self.write_message(&Message::schema(stream, schema.to_json(), key_properties))?;
        self.declared.insert(stream.to_string());
        debug!(stream, "Declared schema");
        Ok(())
    }

    fn emit_record(&mut self, stream: &str, record: FlatRecord) -> Result<()> {
        if !self.is_declared(stream) {
            return Err(Error::UndeclaredStream {
                stream: stream.to_string(),
            });
        }
        self.write_message(&Message::record(stream, record))?;
        self.records_written += 1;
        Ok(())
    }

    fn emit_state(&mut self, state: &JsonValue) -> Result<()> {
        self.write_message(&Message::state(state.clone()))?;
        self.writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
