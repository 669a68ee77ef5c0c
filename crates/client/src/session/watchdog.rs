//! Proactive token-expiry detection.
//!
//! One watchdog guards one authenticated session. It re-validates the
//! live token at the token's exact expiry instant, on a recurring
//! safety-net interval (clock drift, missed timers), and whenever the
//! embedding application reports regaining the foreground (a device that
//! slept past expiry). A failed check ends the session the watchdog was
//! started for -- and only that one: the expiry signal carries the
//! session generation and stale signals are dropped by the manager.

use std::sync::{Arc, Weak};
use std::time::Duration;

use concierge_core::token;
use concierge_core::types::Timestamp;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::session::manager::SessionManager;

/// Handle to a running watchdog, owned by the manager's single slot.
pub struct WatchdogHandle {
    cancel: CancellationToken,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl WatchdogHandle {
    /// Prompt an immediate check (foreground-visibility analog).
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    /// Stop the watchdog. The task exits at its next scheduling point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn a watchdog for the session identified by `generation`.
///
/// Holds only a `Weak` reference to the manager so a dropped manager
/// silently retires its watchdogs.
pub(crate) fn spawn(
    manager: Weak<SessionManager>,
    token_expiry: Option<Timestamp>,
    interval: Duration,
    generation: u64,
) -> WatchdogHandle {
    let cancel = CancellationToken::new();
    let wake = Arc::new(Notify::new());
    let task = tokio::spawn(run(
        manager,
        token_expiry,
        interval,
        generation,
        cancel.clone(),
        Arc::clone(&wake),
    ));
    WatchdogHandle { cancel, wake, task }
}

async fn run(
    manager: Weak<SessionManager>,
    token_expiry: Option<Timestamp>,
    interval: Duration,
    generation: u64,
    cancel: CancellationToken,
    wake: Arc<Notify>,
) {
    // One-shot deadline at the token's exact expiry instant. A token with
    // no readable expiry fails validation at the first safety-net check
    // instead.
    let mut deadline = token_expiry.map(|expiry| {
        let remaining = (expiry - chrono::Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        tokio::time::Instant::now() + remaining
    });

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately; consume it
    // so the safety net starts one full interval out.
    ticker.tick().await;

    tracing::debug!(generation, "watchdog started");

    loop {
        let one_shot = async {
            match deadline {
                Some(instant) => tokio::time::sleep_until(instant).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(generation, "watchdog cancelled");
                return;
            }
            _ = one_shot => {
                deadline = None;
                if check(&manager, generation) {
                    return;
                }
            }
            _ = ticker.tick() => {
                if check(&manager, generation) {
                    return;
                }
            }
            _ = wake.notified() => {
                if check(&manager, generation) {
                    return;
                }
            }
        }
    }
}

/// Re-validate the live token; ends the guarded session when it is gone
/// or stale. Returns `true` when the watchdog is done.
fn check(manager: &Weak<SessionManager>, generation: u64) -> bool {
    let Some(manager) = manager.upgrade() else {
        return true;
    };
    match manager.current_token() {
        Some(token) if token::is_valid(&token) => false,
        _ => {
            tracing::info!(generation, "watchdog found a stale token");
            manager.handle_token_expiration_for(generation);
            true
        }
    }
}
