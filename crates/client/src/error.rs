//! Error types for API calls and session operations.

use concierge_store::StoreError;

/// Errors surfaced by the session manager and the request wrapper.
///
/// Session-invalidating failures (`AuthExpired`, `AuthFailed` on a 401)
/// are raised only after the session has already been cleared centrally;
/// call sites just display the message.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The local token was missing or expired, or the server reported the
    /// session as expired.
    #[error("{0}")]
    AuthExpired(String),

    /// The server rejected the credentials or the token without it being
    /// an expiry.
    #[error("{0}")]
    AuthFailed(String),

    /// 403: the session is fine but lacks the required permission.
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Any other non-success API response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Durable session storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for client call results.
pub type ClientResult<T> = Result<T, ClientError>;
