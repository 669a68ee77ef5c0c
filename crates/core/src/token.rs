//! Bearer-token codec: decode the claims segment and check expiry.
//!
//! The back-office client never verifies token signatures -- that is the
//! API server's job. The client only needs the embedded `exp` claim to
//! decide whether a token is still worth presenting. Decoding is total:
//! any malformed input yields `None`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Safety buffer subtracted from a token's remaining lifetime, so a token
/// that would expire mid-request is already treated as expired.
pub const SKEW_MS: i64 = 10_000;

/// Claims embedded in the payload segment of a bearer token.
///
/// Only the fields the client cares about are modeled; unknown claims are
/// ignored. A token without `exp` is treated as expired (fail-closed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time, seconds since the Unix epoch.
    pub exp: Option<i64>,
    /// Issued-at time, seconds since the Unix epoch.
    pub iat: Option<i64>,
    /// Subject -- the user's id on the API side.
    pub sub: Option<String>,
}

/// Decode the claims segment of a three-segment bearer token.
///
/// Returns `None` on a wrong segment count, invalid base64, or invalid
/// JSON. Never panics.
pub fn decode(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let (_header, payload) = (segments.next()?, segments.next()?);
    segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Check token validity against an explicit clock (milliseconds since the
/// Unix epoch).
///
/// A token is valid when it decodes, carries a numeric `exp`, and expires
/// more than [`SKEW_MS`] in the future.
pub fn is_valid_at(token: &str, now_ms: i64) -> bool {
    match decode(token).and_then(|claims| claims.exp) {
        Some(exp) => exp * 1000 - now_ms > SKEW_MS,
        None => false,
    }
}

/// Check token validity against the current wall clock.
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, chrono::Utc::now().timestamp_millis())
}

/// The token's expiry instant, if it decodes and carries an `exp` claim.
pub fn expires_at(token: &str) -> Option<Timestamp> {
    let exp = decode(token)?.exp?;
    chrono::Utc.timestamp_opt(exp, 0).single()
}
