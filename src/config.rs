//! Tap configuration
//!
//! The configuration is a flat JSON object. The four credential/bootstrap
//! keys are required; everything else has a default.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Production Porter API endpoint
pub const DEFAULT_BASE_URL: &str = "https://porter.revinate.com";

/// Keys that must be present and non-null
pub const REQUIRED_KEYS: [&str; 4] = ["username", "api_key", "api_secret", "start_date"];

/// Validated tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Porter account user name
    pub username: String,

    /// Porter API key
    pub api_key: String,

    /// Shared secret used to sign requests
    pub api_secret: String,

    /// Bootstrap lower bound for the review window (ISO-8601 date or datetime)
    pub start_date: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional client-side request rate cap
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Optional user agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl TapConfig {
    /// Validate and build a config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        validate_keys(&value)?;

        let mut config: TapConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;

        url::Url::parse(&config.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        if config.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than zero",
            ));
        }

        // Reject a bad start_date now rather than halfway through the run
        config.start_timestamp()?;

        Ok(config)
    }

    /// Build a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            Error::config(format!("Failed to decode config. Is it valid json? {e}"))
        })?;
        Self::from_value(value)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json(&contents)
    }

    /// `start_date` as Unix seconds
    pub fn start_timestamp(&self) -> Result<i64> {
        parse_start_date(&self.start_date)
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("base_url", &self.base_url)
            .field("requests_per_second", &self.requests_per_second)
            .finish_non_exhaustive()
    }
}

/// Check that every required key is present and not null
///
/// Missing and null keys are reported together in a single error.
pub fn validate_keys(value: &Value) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Err(Error::config("Config must be a JSON object"));
    };

    let mut missing = Vec::new();
    let mut null = Vec::new();
    for key in REQUIRED_KEYS {
        match object.get(key) {
            None => missing.push(key.to_string()),
            Some(Value::Null) => null.push(key.to_string()),
            Some(_) => {}
        }
    }

    if missing.is_empty() && null.is_empty() {
        return Ok(());
    }
    Err(Error::ConfigKeys { missing, null })
}

/// Parse an ISO-8601 date or datetime into Unix seconds
///
/// Dates are taken at midnight UTC and datetimes without an offset are UTC.
pub fn parse_start_date(raw: &str) -> Result<i64> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| {
            Error::invalid_value(
                "start_date",
                format!("expected an ISO-8601 date or datetime, got '{raw}'"),
            )
        })
}
