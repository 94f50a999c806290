//! Add-to-cart request guard.
//!
//! Each client gets one in-flight slot for add-to-cart lookups:
//!
//! ```text
//! Idle --try_begin--> Pending --(lookup settles + cooldown)--> Idle
//! ```
//!
//! Requests arriving while `Pending` are dropped. The cooldown starts when
//! the lookup settles, not when the request arrived.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

/// Guards idle for longer than this are evicted.
const GUARD_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on tracked clients.
const MAX_TRACKED_CLIENTS: u64 = 100_000;

/// State of a client's add-to-cart slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending,
}

/// Single in-flight slot for one client.
#[derive(Debug)]
pub struct AddToCartGuard {
    state: Mutex<RequestState>,
    cooldown: Duration,
}

impl AddToCartGuard {
    /// Create an idle guard.
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(RequestState::Idle),
            cooldown,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        *self.lock()
    }

    /// Move `Idle -> Pending`, or return `None` if a request is already pending.
    #[must_use]
    pub fn try_begin(self: &Arc<Self>) -> Option<InFlight> {
        let mut state = self.lock();
        match *state {
            RequestState::Pending => None,
            RequestState::Idle => {
                *state = RequestState::Pending;
                Some(InFlight {
                    guard: Some(Arc::clone(self)),
                })
            }
        }
    }

    fn release(&self) {
        *self.lock() = RequestState::Idle;
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Token for an admitted request. Settling it (or dropping it) schedules the
/// return to `Idle` after the cooldown.
#[derive(Debug)]
#[must_use = "dropping an InFlight token starts the cooldown immediately"]
pub struct InFlight {
    guard: Option<Arc<AddToCartGuard>>,
}

impl InFlight {
    /// Mark the lookup as settled.
    pub fn settle(mut self) {
        if let Some(guard) = self.guard.take() {
            schedule_release(guard);
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            schedule_release(guard);
        }
    }
}

fn schedule_release(guard: Arc<AddToCartGuard>) {
    if guard.cooldown.is_zero() {
        guard.release();
        return;
    }

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(guard.cooldown).await;
                guard.release();
                debug!("Add-to-cart guard released");
            });
        }
        // No runtime to wait on, so skip the cooldown.
        Err(_) => guard.release(),
    }
}

/// Per-client guards, keyed by session id.
#[derive(Clone)]
pub struct GuardRegistry {
    guards: Cache<String, Arc<AddToCartGuard>>,
    cooldown: Duration,
}

impl GuardRegistry {
    /// Create a registry whose guards use `cooldown`.
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        let guards = Cache::builder()
            .max_capacity(MAX_TRACKED_CLIENTS)
            .time_to_idle(GUARD_IDLE_TTL)
            .build();

        Self { guards, cooldown }
    }

    /// The guard for `client`, created idle on first use.
    pub async fn guard_for(&self, client: &str) -> Arc<AddToCartGuard> {
        let cooldown = self.cooldown;
        self.guards
            .get_with(client.to_owned(), async move {
                Arc::new(AddToCartGuard::new(cooldown))
            })
            .await
    }
}
