//! Persisted state document

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// State carried between runs
///
/// Unknown keys are kept and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TapState {
    /// Max review `updatedAt` seen by the previous run (Unix seconds)
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<i64>,

    /// Everything else in the state object
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl TapState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::state(format!("Failed to read state file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Parse state from a JSON string
    ///
    /// An empty document is an empty state.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))
    }

    /// Return a copy with `last_update` replaced
    #[must_use]
    pub fn with_last_update(mut self, last_update: i64) -> Self {
        self.last_update = Some(last_update);
        self
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Accept an integer, a float or a numeric string; `null` means unset
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("last_update out of range")),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid last_update: {s:?}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid last_update: {other}"
        ))),
    }
}
