//! Watchdog behavior in real time: staleness detection, replacement
//! safety, and foreground wakes.
//!
//! Tokens carry a 10-second validity skew, so a 12-second TTL becomes
//! stale roughly two seconds after login. Tests poll rather than sleep
//! for exact instants to stay robust on slow machines.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use concierge_client::{ClientConfig, LogoutReason, SessionEvent, SessionManager};
use concierge_store::{MemorySessionStore, SessionStore};

use common::{spawn_stub, wait_until, StubApi, TEST_EMAIL, TEST_PASSWORD};

fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        watchdog_interval_secs: 1,
        ..ClientConfig::for_api(base_url)
    }
}

#[tokio::test]
async fn watchdog_forces_logout_once_the_token_goes_stale() {
    common::init_tracing();
    let (stub, base_url) = spawn_stub(StubApi::default()).await;
    stub.token_ttl_secs.store(12, Ordering::SeqCst);

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(fast_config(&base_url), store);
    manager.initialize();
    manager
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("login should succeed");
    let mut events = manager.subscribe();
    assert!(manager.is_authenticated());

    let logged_out = wait_until(|| !manager.is_authenticated(), Duration::from_secs(8)).await;
    assert!(logged_out, "the watchdog must force a logout");
    assert_matches!(
        events.recv().await,
        Ok(SessionEvent::LoggedOut {
            reason: LogoutReason::TokenExpired
        })
    );
}

#[tokio::test]
async fn a_stale_watchdog_never_logs_out_the_replacement_session() {
    let (stub, base_url) = spawn_stub(StubApi::default()).await;
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(fast_config(&base_url), store);
    manager.initialize();

    // Session A: goes stale roughly two seconds in.
    stub.token_ttl_secs.store(12, Ordering::SeqCst);
    manager
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("login A should succeed");

    // Session B, long-lived, replaces A immediately.
    stub.token_ttl_secs.store(3600, Ordering::SeqCst);
    let session_b = manager
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("login B should succeed");

    // Give any leftover timer from session A ample room to misfire.
    tokio::time::sleep(Duration::from_secs(4)).await;

    assert!(
        manager.is_authenticated(),
        "session B must survive session A's timers"
    );
    assert_eq!(manager.current_token(), Some(session_b.token));
}

#[tokio::test]
async fn a_foreground_wake_triggers_an_immediate_check() {
    let (stub, base_url) = spawn_stub(StubApi::default()).await;
    // Hour-long safety net: only the wake (or the exact-expiry one-shot,
    // twelve seconds out) could catch the staleness this early.
    let config = ClientConfig {
        watchdog_interval_secs: 3600,
        ..ClientConfig::for_api(&base_url)
    };
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(config, store);
    manager.initialize();

    stub.token_ttl_secs.store(12, Ordering::SeqCst);
    manager
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("login should succeed");

    // Let the token fall inside the skew window; nothing has checked yet.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(manager.is_authenticated(), "no check should have run yet");

    manager.notify_foreground();
    let logged_out = wait_until(|| !manager.is_authenticated(), Duration::from_secs(2)).await;
    assert!(logged_out, "the wake must prompt an immediate check");
}

#[tokio::test]
async fn logout_cancels_the_watchdog() {
    let (_stub, base_url) = spawn_stub(StubApi::default()).await;
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(fast_config(&base_url), store);
    manager.initialize();
    manager
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("login should succeed");
    assert!(manager.watchdog_active());

    manager.logout();
    assert!(!manager.watchdog_active());
}
