//! HTTP client and session lifecycle for the concierge back-office.
//!
//! [`SessionManager`] is the in-memory authority for the authenticated
//! session: it restores a persisted session at startup, performs logins,
//! guards the token with a background expiry watchdog, and broadcasts
//! every transition to subscribers. [`ApiClient`] wraps all other API
//! traffic, refusing stale tokens up front and translating
//! server-classified session failures into exactly one forced logout.

pub mod classify;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use session::manager::{LogoutReason, SessionEvent, SessionManager, SessionState};
