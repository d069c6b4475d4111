//! In-memory sink

use super::types::Message;
use super::Sink;
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use crate::types::{FlatRecord, JsonValue};

/// Collects every message in order
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Vec<Message>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records emitted for one stream, in order
    pub fn records(&self, stream: &str) -> Vec<&FlatRecord> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Names of declared streams, in declaration order
    pub fn declared_streams(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.is_schema())
            .filter_map(Message::stream)
            .collect()
    }

    /// The most recent state value
    pub fn last_state(&self) -> Option<&JsonValue> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::State { value } => Some(value),
            _ => None,
        })
    }
}

impl Sink for MemorySink {
    fn declare_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[&str],
    ) -> Result<()> {
        self.messages
            .push(Message::schema(stream, schema.to_json(), key_properties));
        Ok(())
    }

    fn emit_record(&mut self, stream: &str, record: FlatRecord) -> Result<()> {
        if !self.declared_streams().contains(&stream) {
            return Err(Error::UndeclaredStream {
                stream: stream.to_string(),
            });
        }
        self.messages.push(Message::record(stream, record));
        Ok(())
    }

    fn emit_state(&mut self, state: &JsonValue) -> Result<()> {
        self.messages.push(Message::state(state.clone()));
        Ok(())
    }
}
