//! Classification of failed API response bodies.
//!
//! The API reports failures as a loose `{error?, message?, code?}` JSON
//! object. Token and session failures must force a logout; everything
//! else is surfaced to the caller as-is. Classification is total:
//! malformed bodies come back as generic, non-session errors.

use serde::Deserialize;

/// Error code the API uses for an expired bearer token.
const CODE_TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";

/// Lowercase phrases that mark a 401 body as an auth failure.
const AUTH_FAILURE_PHRASES: &[&str] = &[
    "invalid token",
    "no token provided",
    "user not found",
    "please authenticate",
    "unauthorized",
    "authentication required",
];

/// Fixed user-facing message for an expired session.
pub const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Fixed user-facing message for a non-expiry auth failure.
pub const MSG_AUTH_FAILED: &str = "Authentication failed. Please log in again.";

/// Fallback when a body carries no usable message.
pub const MSG_GENERIC: &str = "Request failed";

/// What a failed response body means for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The token is past its expiry (sentinel code, or the message says so).
    pub is_token_expired: bool,
    /// Any recognized auth failure, expiry included. Forces a logout.
    pub is_token_error: bool,
    /// User-presentable message.
    pub message: String,
}

/// The loose failure-body shape the API emits.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    code: Option<String>,
}

/// Classify a failed response body.
pub fn classify(body: &serde_json::Value) -> Classification {
    let parsed: ErrorBody = serde_json::from_value(body.clone()).unwrap_or_default();

    let text = parsed
        .error
        .as_deref()
        .or(parsed.message.as_deref())
        .unwrap_or_default()
        .to_lowercase();

    let is_token_expired =
        parsed.code.as_deref() == Some(CODE_TOKEN_EXPIRED) || text.contains("token expired");

    let is_token_error = is_token_expired
        || AUTH_FAILURE_PHRASES
            .iter()
            .any(|phrase| text.contains(phrase));

    let message = if is_token_expired {
        MSG_SESSION_EXPIRED.to_string()
    } else if is_token_error {
        MSG_AUTH_FAILED.to_string()
    } else {
        parsed
            .error
            .or(parsed.message)
            .unwrap_or_else(|| MSG_GENERIC.to_string())
    };

    Classification {
        is_token_expired,
        is_token_error,
        message,
    }
}
