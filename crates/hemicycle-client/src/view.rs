//! Per-view load state guarded by a request generation.
//!
//! Requests are not cancellable, so when a view re-filters while an older
//! fetch is still in flight, both responses eventually arrive, in either
//! order. Each load takes a [`Ticket`] carrying the generation at which it
//! started; its result is applied only if no newer load began since.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::ClientError;

/// What a view shows when its data could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub message: String,
    pub status: Option<u16>,
    /// Whether to offer a manual retry.
    pub retryable: bool,
}

impl From<&ClientError> for ErrorState {
    fn from(e: &ClientError) -> Self {
        Self {
            message: e.user_message(),
            status: e.status(),
            retryable: !matches!(e, ClientError::Config(_)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Shown with a manual retry action; retrying is another [`ViewSlot::load`].
    Failed(ErrorState),
}

/// Generation at which a load started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

pub struct ViewSlot<T> {
    generation: AtomicU64,
    state: Mutex<ViewState<T>>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            state: Mutex::new(ViewState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new load, superseding any in flight.
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock() = ViewState::Loading;
        Ticket(generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply a result if `ticket` is still current. Returns whether it was applied.
    pub fn resolve(&self, ticket: Ticket, result: Result<T, ClientError>) -> bool {
        let mut state = self.lock();
        // Checked under the state lock so a concurrent `begin` cannot slip in between.
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "discarding stale response");
            return false;
        }
        *state = match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Failed(ErrorState::from(&e)),
        };
        true
    }

    /// Run `fetch` under a fresh ticket and apply its result if still current.
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.resolve(ticket, result)
    }

    /// Supersede any in-flight load without starting one (e.g. the view closed).
    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.lock() = ViewState::Idle;
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ViewState<T>) -> R) -> R {
        f(&self.lock())
    }
}

impl<T: Clone> ViewSlot<T> {
    pub fn state(&self) -> ViewState<T> {
        self.lock().clone()
    }
}
