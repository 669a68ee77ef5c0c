//! File-backed session store under an application state directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use concierge_core::session::{PersistedSession, Session};
use concierge_core::token;

use crate::{SessionStore, StoreError};

/// Entry holding the raw bearer token.
const TOKEN_FILE: &str = "token";
/// Entry holding the serialized session record.
const SESSION_FILE: &str = "session.json";
/// Transient entry holding the post-login return route.
const RETURN_ROUTE_FILE: &str = "return_route";

/// Stores the session pair as files in a single directory.
pub struct FsSessionStore {
    dir: PathBuf,
}

impl FsSessionStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn remove_if_present(&self, name: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_if_present(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FsSessionStore {
    fn save(&self, session: &Session) -> Result<(), StoreError> {
        // Token first: a reader that sees the token without the record
        // treats the pair as absent.
        fs::write(self.path(TOKEN_FILE), &session.token)?;
        let record = PersistedSession {
            is_authenticated: true,
            user: session.user.clone(),
        };
        fs::write(self.path(SESSION_FILE), serde_json::to_vec(&record)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>, StoreError> {
        let token = Self::read_if_present(&self.path(TOKEN_FILE))?;
        let raw_record = Self::read_if_present(&self.path(SESSION_FILE))?;

        let (token, raw_record) = match (token, raw_record) {
            (Some(token), Some(record)) => (token, record),
            (None, None) => return Ok(None),
            _ => {
                tracing::warn!("half-written session pair found, clearing");
                self.clear()?;
                return Ok(None);
            }
        };

        if !token::is_valid(&token) {
            tracing::info!("persisted token is no longer valid, clearing session");
            self.clear()?;
            return Ok(None);
        }

        let record: PersistedSession = match serde_json::from_str(&raw_record) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable session record, clearing");
                self.clear()?;
                return Ok(None);
            }
        };

        Ok(Some(Session {
            user: record.user,
            token,
        }))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.remove_if_present(TOKEN_FILE)?;
        self.remove_if_present(SESSION_FILE)?;
        Ok(())
    }

    fn save_return_route(&self, route: &str) -> Result<(), StoreError> {
        fs::write(self.path(RETURN_ROUTE_FILE), route)?;
        Ok(())
    }

    fn take_return_route(&self) -> Result<Option<String>, StoreError> {
        let route = Self::read_if_present(&self.path(RETURN_ROUTE_FILE))?;
        if route.is_some() {
            self.remove_if_present(RETURN_ROUTE_FILE)?;
        }
        Ok(route)
    }
}
