//! The authenticated identity: user profile, granted permissions, and the
//! bearer credential.

use serde::{Deserialize, Serialize};

/// The operator profile carried by a session.
///
/// Mirrors what the login endpoint reports about the signed-in operator:
/// identity, role, and the flattened permission tags granted by that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque user id assigned by the API.
    pub id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    /// Opaque role id assigned by the API.
    pub role_id: String,
    /// Permission tags granted by the role. Order carries no meaning.
    pub permissions: Vec<String>,
}

impl UserProfile {
    pub fn has_permission(&self, tag: &str) -> bool {
        self.permissions.iter().any(|granted| granted == tag)
    }
}

/// An authenticated identity plus its bearer credential.
///
/// Sessions are replaced whole on every change; fields are never patched
/// in place, so observers can never see a torn half-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: UserProfile,
    /// Bearer token presented on every authenticated request.
    pub token: String,
}

impl Session {
    pub fn has_permission(&self, tag: &str) -> bool {
        self.user.has_permission(tag)
    }
}

/// Durable mirror of a session, minus the token.
///
/// The token is persisted under its own storage entry so a reader can
/// validate it before deserializing this record; see `concierge-store`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub user: UserProfile,
}
