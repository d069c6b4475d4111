//! Authentication module
//!
//! Porter authenticates every request with four custom headers: the user
//! name, a Unix timestamp, the API key, and an HMAC-SHA256 digest of
//! `username + timestamp` keyed by the shared secret.

mod signer;

pub use signer::{
    skewed_timestamp, PorterCredentials, CLOCK_SKEW_SECS, ENCODED_HEADER, KEY_HEADER,
    TIMESTAMP_HEADER, USERNAME_HEADER,
};
