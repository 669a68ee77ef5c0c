//! Durable persistence for the back-office session.
//!
//! A session survives restarts as two sibling entries: the raw bearer
//! token and the serialized remainder ([`PersistedSession`]). The split
//! lets a reader validate the token before deserializing the heavier
//! record. Both entries are written together and cleared together; a
//! reader that finds only one of the two treats the pair as absent and
//! wipes the remnant.
//!
//! [`PersistedSession`]: concierge_core::session::PersistedSession

mod error;
mod fs;
mod memory;

pub use error::StoreError;
pub use fs::FsSessionStore;
pub use memory::MemorySessionStore;

use concierge_core::session::Session;

/// Durable storage for the session pair plus the transient return route.
///
/// `load` returns `Some` only when both entries are present and the token
/// still passes [`concierge_core::token::is_valid`]; any other state is
/// cleared and reported as absent. `clear` is idempotent.
pub trait SessionStore: Send + Sync {
    /// Persist the session: the token entry first, then the record.
    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Load the persisted session, clearing partial or stale state.
    fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Delete both session entries.
    fn clear(&self) -> Result<(), StoreError>;

    /// Remember the route to restore after the next successful login.
    fn save_return_route(&self, route: &str) -> Result<(), StoreError>;

    /// Consume the remembered route, if any.
    fn take_return_route(&self) -> Result<Option<String>, StoreError>;
}
