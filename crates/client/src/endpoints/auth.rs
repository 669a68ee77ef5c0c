//! DTOs for the `/login` endpoint and their normalization into a
//! [`Session`].

use concierge_core::session::{Session, UserProfile};
use serde::{Deserialize, Serialize};

/// Request body for `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response envelope from `POST /login`.
///
/// `success: true` carries `result`; `success: false` carries `message`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<LoginResult>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The authenticated-operator payload inside a successful login response.
#[derive(Debug, Deserialize)]
pub struct LoginResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Role id.
    pub role: String,
    pub token: String,
    #[serde(rename = "roleData", default)]
    pub role_data: Option<RoleData>,
}

/// Role payload carrying the granted permission tags.
#[derive(Debug, Default, Deserialize)]
pub struct RoleData {
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl LoginResult {
    /// Normalize the wire shape into the canonical [`Session`].
    pub fn into_session(self) -> Session {
        let permissions = self
            .role_data
            .map(|role| role.permissions)
            .unwrap_or_default();
        Session {
            user: UserProfile {
                id: self.id,
                email: self.email,
                name: self.name,
                role_id: self.role,
                permissions,
            },
            token: self.token,
        }
    }
}
