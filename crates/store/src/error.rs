use std::io;

/// Errors surfaced by session store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a storage entry failed.
    #[error("Session storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The session record could not be serialized.
    #[error("Session record serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
