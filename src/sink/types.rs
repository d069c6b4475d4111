//! Line protocol messages

use crate::types::{FlatRecord, JsonValue};
use serde::{Deserialize, Serialize};

/// A message on the output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema declaration
    Schema {
        stream: String,
        schema: JsonValue,
        key_properties: Vec<String>,
    },
    /// One row
    Record {
        stream: String,
        record: FlatRecord,
        /// RFC 3339 UTC time the row was written
        time_extracted: String,
    },
    /// Cursor state
    State { value: JsonValue },
}

impl Message {
    /// Create a schema message
    pub fn schema(stream: &str, schema: JsonValue, key_properties: &[&str]) -> Self {
        Self::Schema {
            stream: stream.to_string(),
            schema,
            key_properties: key_properties.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a record message stamped with the current time
    pub fn record(stream: &str, record: FlatRecord) -> Self {
        Self::Record {
            stream: stream.to_string(),
            record,
            time_extracted: chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        }
    }

    /// Create a state message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }

    /// Stream the message belongs to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}
