//! The in-memory authority for the authenticated session.
//!
//! [`SessionManager`] is constructed explicitly and injected wherever the
//! embedding application needs it; separate instances never share state,
//! so tests can run managers side by side. Every transition is broadcast
//! to subscribers, and all session-ending paths funnel through one
//! idempotent routine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use concierge_core::session::Session;
use concierge_core::token;
use concierge_store::SessionStore;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::endpoints::auth::{LoginRequest, LoginResponse};
use crate::error::{ClientError, ClientResult};
use crate::session::watchdog::{self, WatchdogHandle};

/// Buffer capacity of the session event channel.
const EVENT_CAPACITY: usize = 32;

/// Lifecycle state of the back-office session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Startup, before the first restore attempt.
    Uninitialized,
    /// A valid session is present.
    Authenticated(Session),
    /// No session, or the last one was invalidated.
    Unauthenticated,
}

/// Notification broadcast on every session state transition.
///
/// Listeners must tolerate replays and duplicates; transitions are
/// idempotent and a slow receiver may observe a lagged stream.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// `initialize` finished; says whether a persisted session was restored.
    Initialized { authenticated: bool },
    /// A login produced a fresh session.
    LoggedIn { user_id: String },
    /// The session ended.
    LoggedOut { reason: LogoutReason },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit operator action.
    UserAction,
    /// The token expired, or the server classified the session as invalid.
    TokenExpired,
}

/// Owns the current session, its durable mirror, and the watchdog slot.
pub struct SessionManager {
    config: ClientConfig,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
    /// Bumped on every transition. Expiry signals carry the generation
    /// they were raised for and are dropped once it goes stale, so a
    /// leftover timer from session N can never end session N+1.
    generation: AtomicU64,
    inner: Mutex<Inner>,
}

struct Inner {
    state: SessionState,
    initialized: bool,
    active_route: Option<String>,
    watchdog: Option<WatchdogHandle>,
}

impl SessionManager {
    /// Build a manager over `store`. No I/O happens until
    /// [`initialize`](Self::initialize) or [`login`](Self::login).
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("HTTP client construction with static options cannot fail");
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Arc::new(Self {
            config,
            http,
            store,
            events,
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: SessionState::Uninitialized,
                initialized: false,
                active_route: None,
                watchdog: None,
            }),
        })
    }

    /// Restore a persisted session, if any.
    ///
    /// Callable once; later calls are no-ops. Requires a Tokio runtime
    /// (the watchdog is spawned here on success). A restore failure is a
    /// normal unauthenticated start, not an error.
    pub fn initialize(self: &Arc<Self>) {
        let mut inner = self.lock_inner();
        if inner.initialized {
            return;
        }
        inner.initialized = true;

        let restored = match self.store.load() {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, "restored persisted session");
                let generation = self.bump_generation();
                self.start_watchdog(&mut inner, &session, generation);
                inner.state = SessionState::Authenticated(session);
                true
            }
            Ok(None) => {
                inner.state = SessionState::Unauthenticated;
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed");
                inner.state = SessionState::Unauthenticated;
                false
            }
        };
        drop(inner);

        let _ = self.events.send(SessionEvent::Initialized {
            authenticated: restored,
        });
    }

    /// Authenticate against the remote API.
    ///
    /// Every failure comes back as an `Err` carrying a user-presentable
    /// message; this method never panics and never leaves a half-written
    /// session behind.
    pub async fn login(self: &Arc<Self>, email: &str, password: &str) -> ClientResult<Session> {
        let url = format!("{}/login", self.config.api_url);
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let status = response.status();
        let body: LoginResponse = response.json().await?;

        let result = match (body.success, body.result) {
            (true, Some(result)) => result,
            _ => {
                let message = body
                    .message
                    .unwrap_or_else(|| "Invalid email or password".to_string());
                tracing::warn!(status = %status, "login rejected");
                return Err(ClientError::AuthFailed(message));
            }
        };

        let session = result.into_session();
        self.store.save(&session)?;

        let generation = self.bump_generation();
        {
            let mut inner = self.lock_inner();
            self.start_watchdog(&mut inner, &session, generation);
            inner.state = SessionState::Authenticated(session.clone());
        }

        tracing::info!(user_id = %session.user.id, "login succeeded");
        let _ = self.events.send(SessionEvent::LoggedIn {
            user_id: session.user.id.clone(),
        });
        Ok(session)
    }

    /// End the session on explicit operator action.
    pub fn logout(&self) {
        self.end_session(LogoutReason::UserAction);
    }

    /// End the session because the token expired or the server rejected it.
    pub fn handle_token_expiration(&self) {
        self.end_session(LogoutReason::TokenExpired);
    }

    /// Generation-guarded expiry handling. A stale watchdog tick, or a 401
    /// from a request that raced a re-login, must not end the newer
    /// session.
    pub(crate) fn handle_token_expiration_for(&self, generation: u64) {
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "ignoring expiry signal for a replaced session");
            return;
        }
        self.end_session(LogoutReason::TokenExpired);
    }

    /// Current lifecycle state (cloned snapshot).
    pub fn state(&self) -> SessionState {
        self.lock_inner().state.clone()
    }

    /// Whether the first restore attempt has completed.
    pub fn is_initialized(&self) -> bool {
        self.lock_inner().initialized
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.lock_inner().state, SessionState::Authenticated(_))
    }

    /// The live session, if authenticated.
    pub fn current_session(&self) -> Option<Session> {
        match &self.lock_inner().state {
            SessionState::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// The live bearer token, if authenticated.
    pub fn current_token(&self) -> Option<String> {
        match &self.lock_inner().state {
            SessionState::Authenticated(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    /// Membership test against the current session's permission tags.
    /// Always `false` when unauthenticated.
    pub fn has_permission(&self, tag: &str) -> bool {
        match &self.lock_inner().state {
            SessionState::Authenticated(session) => session.has_permission(tag),
            _ => false,
        }
    }

    /// The navigation items the current session may see. Empty when
    /// unauthenticated.
    pub fn visible_nav(&self) -> Vec<concierge_core::nav::NavItem> {
        concierge_core::nav::filter_nav(&concierge_core::nav::default_nav(), &|tag| {
            self.has_permission(tag)
        })
    }

    /// Record the route the operator is currently on. Captured as the
    /// post-login return target when the session ends.
    pub fn set_active_route(&self, route: impl Into<String>) {
        self.lock_inner().active_route = Some(route.into());
    }

    /// Consume the remembered post-login return route, if any.
    pub fn take_return_route(&self) -> Option<String> {
        self.store.take_return_route().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read return route");
            None
        })
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Report that the embedding application regained the foreground,
    /// prompting an immediate watchdog check.
    pub fn notify_foreground(&self) {
        if let Some(watchdog) = &self.lock_inner().watchdog {
            watchdog.wake();
        }
    }

    /// Whether a watchdog is currently guarding the session.
    pub fn watchdog_active(&self) -> bool {
        self.lock_inner().watchdog.is_some()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("session state lock poisoned")
    }

    /// Cancel any previous watchdog and start one for `session`.
    /// The single slot guarantees at most one outstanding expiry timer.
    fn start_watchdog(self: &Arc<Self>, inner: &mut Inner, session: &Session, generation: u64) {
        if let Some(previous) = inner.watchdog.take() {
            previous.cancel();
        }
        inner.watchdog = Some(watchdog::spawn(
            Arc::downgrade(self),
            token::expires_at(&session.token),
            Duration::from_secs(self.config.watchdog_interval_secs),
            generation,
        ));
    }

    /// The single session-ending path: cancel the watchdog, clear the
    /// durable mirror, remember the return route, notify subscribers.
    /// Idempotent -- a second call finds nothing left to tear down.
    fn end_session(&self, reason: LogoutReason) {
        // Invalidate outstanding expiry signals before anything else.
        self.generation.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.lock_inner();
        if let Some(watchdog) = inner.watchdog.take() {
            watchdog.cancel();
        }
        let was_authenticated = matches!(inner.state, SessionState::Authenticated(_));
        inner.state = SessionState::Unauthenticated;

        if was_authenticated {
            if let Some(route) = inner.active_route.clone() {
                if let Err(e) = self.store.save_return_route(&route) {
                    tracing::warn!(error = %e, "failed to remember return route");
                }
            }
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        drop(inner);

        if was_authenticated {
            match reason {
                LogoutReason::UserAction => tracing::info!("logged out"),
                LogoutReason::TokenExpired => {
                    tracing::info!("session invalidated, forcing logout")
                }
            }
            let _ = self.events.send(SessionEvent::LoggedOut { reason });
        }
    }
}
