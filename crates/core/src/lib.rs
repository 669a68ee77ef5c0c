//! Pure domain types and logic for the concierge back-office client.
//!
//! Everything here is side-effect free: the bearer-token codec, the
//! session/user model, the permission tags, and the navigation tree with
//! its permission filter. Persistence lives in `concierge-store`; network
//! I/O and the session lifecycle live in `concierge-client`.

pub mod nav;
pub mod permissions;
pub mod session;
pub mod token;
pub mod types;
