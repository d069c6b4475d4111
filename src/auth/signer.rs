//! Porter request signing

use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::types::StringMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the account user name
pub const USERNAME_HEADER: &str = "X-Revinate-Porter-Username";
/// Header carrying the signed Unix timestamp
pub const TIMESTAMP_HEADER: &str = "X-Revinate-Porter-Timestamp";
/// Header carrying the API key
pub const KEY_HEADER: &str = "X-Revinate-Porter-Key";
/// Header carrying the hex HMAC digest
pub const ENCODED_HEADER: &str = "X-Revinate-Porter-Encoded";

/// Seconds subtracted from the wall clock before signing
pub const CLOCK_SKEW_SECS: i64 = 5 * 60;

/// Timestamp to sign with, pushed into the past to tolerate clock skew
pub fn skewed_timestamp(now: i64) -> i64 {
    now - CLOCK_SKEW_SECS
}

/// Credentials needed to sign Porter requests
#[derive(Clone)]
pub struct PorterCredentials {
    username: String,
    api_key: String,
    api_secret: String,
}

impl PorterCredentials {
    /// Create credentials from their parts
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Take credentials from a validated config
    pub fn from_config(config: &TapConfig) -> Self {
        Self::new(&config.username, &config.api_key, &config.api_secret)
    }

    /// Account user name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Hex-encoded HMAC-SHA256 of `username + timestamp`
    pub fn sign(&self, timestamp: i64) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| Error::auth(format!("Invalid API secret: {e}")))?;
        mac.update(self.username.as_bytes());
        mac.update(timestamp.to_string().as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Full header set for requests signed at `timestamp`
    pub fn headers(&self, timestamp: i64) -> Result<StringMap> {
        let digest = self.sign(timestamp)?;
        debug!(timestamp, "Generated user-time hash key");

        let mut headers = StringMap::new();
        headers.insert(USERNAME_HEADER.to_string(), self.username.clone());
        headers.insert(TIMESTAMP_HEADER.to_string(), timestamp.to_string());
        headers.insert(KEY_HEADER.to_string(), self.api_key.clone());
        headers.insert(ENCODED_HEADER.to_string(), digest);
        Ok(headers)
    }
}

impl std::fmt::Debug for PorterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorterCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
