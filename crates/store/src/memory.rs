//! In-memory session store for tests and short-lived embeddings.

use std::sync::Mutex;

use concierge_core::session::{PersistedSession, Session};
use concierge_core::token;

use crate::{SessionStore, StoreError};

/// Keeps the session pair in memory, with the same pairing and validity
/// semantics as the file-backed store.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    token: Option<String>,
    record: Option<String>,
    return_route: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("session store lock poisoned")
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let record = PersistedSession {
            is_authenticated: true,
            user: session.user.clone(),
        };
        let serialized = serde_json::to_string(&record)?;
        let mut inner = self.lock();
        inner.token = Some(session.token.clone());
        inner.record = Some(serialized);
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>, StoreError> {
        let mut inner = self.lock();
        let (token, raw_record) = match (inner.token.clone(), inner.record.clone()) {
            (Some(token), Some(record)) => (token, record),
            (None, None) => return Ok(None),
            _ => {
                inner.token = None;
                inner.record = None;
                return Ok(None);
            }
        };

        if !token::is_valid(&token) {
            inner.token = None;
            inner.record = None;
            return Ok(None);
        }

        match serde_json::from_str::<PersistedSession>(&raw_record) {
            Ok(record) => Ok(Some(Session {
                user: record.user,
                token,
            })),
            Err(_) => {
                inner.token = None;
                inner.record = None;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.token = None;
        inner.record = None;
        Ok(())
    }

    fn save_return_route(&self, route: &str) -> Result<(), StoreError> {
        self.lock().return_route = Some(route.to_string());
        Ok(())
    }

    fn take_return_route(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().return_route.take())
    }
}
