//! Deferred callback queue.
//!
//! Turns request/response and timeout-bounded waits into a uniform
//! completion event:
//!
//! ```text
//! register(key, deadline, on_complete)
//!        │
//!        ├── resolve(key) before deadline ──► Succeeded
//!        └── sweep(now) past deadline ──────► TimedOut
//!                       │
//!                       ▼
//!        on_complete(status) + QueueCompleted occurrence
//! ```
//!
//! A key maps to at most one pending entry. Each entry completes exactly
//! once: whichever of `resolve`/`sweep` removes it first wins, and the
//! other path's effect on that key is a no-op. Lookup and removal are a
//! single atomic step under one lock; the completion callback and the
//! dispatch both run with the lock released.
//!
//! A wait may be resolved from inside an observer callback. The
//! continuation still runs immediately, but the completion occurrence is
//! parked until the next sweep: the fan-out pass that invoked the
//! callback holds the dispatch lock, and dispatching here would
//! re-enter it.
//!
//! Sweep cadence is one monitor tick, so timeout latency is bounded by
//! the deadline plus one tick width — and never less than the deadline.

use crate::dispatcher::Dispatcher;
use crate::error::HostError;
use knot_event::{CompletionStatus, Event};
use knot_types::QueueKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Completion continuation of one pending entry.
pub type CompleteFn = dyn FnOnce(CompletionStatus) + Send;

struct PendingEntry {
    deadline: Instant,
    on_complete: Box<CompleteFn>,
}

/// Receipt for one registered deferred wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// The key the wait is pending under.
    pub key: QueueKey,
    /// Absolute deadline after which a sweep times the wait out.
    pub deadline: Instant,
}

/// Keyed set of pending deferred waits with deadlines.
pub struct CallbackQueue {
    dispatcher: Arc<Dispatcher>,
    pending: Mutex<HashMap<QueueKey, PendingEntry>>,
    // Completion occurrences from resolutions made inside a fan-out
    // pass, waiting for the next sweep to emit them.
    deferred: Mutex<Vec<(QueueKey, CompletionStatus)>>,
}

impl CallbackQueue {
    /// Creates a queue emitting completions through `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            pending: Mutex::new(HashMap::new()),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// Registers a wait under `key` with an absolute `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DuplicateKey`] if `key` already has a
    /// pending entry. The existing entry is not overwritten; the caller
    /// decides whether to resolve it first or pick a different key.
    pub fn register<F>(
        &self,
        key: impl Into<QueueKey>,
        deadline: Instant,
        on_complete: F,
    ) -> Result<Ticket, HostError>
    where
        F: FnOnce(CompletionStatus) + Send + 'static,
    {
        let key = key.into();
        let mut pending = self.pending.lock();
        if pending.contains_key(&key) {
            return Err(HostError::DuplicateKey(key));
        }
        pending.insert(
            key.clone(),
            PendingEntry {
                deadline,
                on_complete: Box::new(on_complete),
            },
        );
        debug!(key = %key, "deferred wait registered");
        Ok(Ticket { key, deadline })
    }

    /// Resolves the pending wait for `key` as succeeded.
    ///
    /// Returns `true` if a pending entry was completed. An absent key is
    /// a tolerated no-op (`false`): acknowledgements race with local
    /// timeout expiry, and the late path must lose silently.
    ///
    /// Safe to call from inside an observer callback; the completion
    /// occurrence is then emitted by the next sweep rather than
    /// mid-pass.
    pub fn resolve(&self, key: &QueueKey) -> bool {
        let entry = self.pending.lock().remove(key);
        match entry {
            Some(entry) => {
                self.complete(key.clone(), entry, CompletionStatus::Succeeded);
                true
            }
            None => {
                debug!(key = %key, "late or duplicate resolution ignored");
                false
            }
        }
    }

    /// Times out every pending wait whose deadline is at or before `now`.
    ///
    /// Returns the number of entries timed out. Called once per monitor
    /// tick. Also emits completion occurrences parked by resolutions
    /// made inside a fan-out pass.
    pub fn sweep(&self, now: Instant) -> usize {
        self.flush_deferred();
        let expired: Vec<(QueueKey, PendingEntry)> = {
            let mut pending = self.pending.lock();
            let keys: Vec<QueueKey> = pending
                .iter()
                .filter(|(_, entry)| entry.deadline <= now)
                .map(|(key, _)| key.clone())
                .collect();
            keys.into_iter()
                .filter_map(|key| pending.remove(&key).map(|entry| (key, entry)))
                .collect()
        };

        let count = expired.len();
        for (key, entry) in expired {
            self.complete(key, entry, CompletionStatus::TimedOut);
        }
        count
    }

    /// Returns the number of pending waits.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if a wait is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: &QueueKey) -> bool {
        self.pending.lock().contains_key(key)
    }

    /// Drops every pending wait without firing completions.
    ///
    /// Used at host teardown, where completion occurrences would race
    /// the dispatcher seal.
    pub(crate) fn clear(&self) {
        let dropped = {
            let mut pending = self.pending.lock();
            let n = pending.len();
            pending.clear();
            n
        };
        self.deferred.lock().clear();
        if dropped > 0 {
            debug!(dropped, "pending deferred waits dropped at teardown");
        }
    }

    // Entry already removed from the pending set; runs the continuation
    // and emits the completion occurrence, both outside the lock.
    fn complete(&self, key: QueueKey, entry: PendingEntry, status: CompletionStatus) {
        (entry.on_complete)(status);
        debug!(key = %key, ?status, "deferred wait completed");
        if self.dispatcher.in_pass() {
            // Resolved from inside an observer callback: the running
            // pass holds the dispatch lock, so the occurrence waits for
            // the next sweep.
            self.deferred.lock().push((key, status));
            return;
        }
        self.emit(key, status);
    }

    // Emits parked completion occurrences. Skipped while a pass is
    // running on this thread; the next sweep picks them up.
    fn flush_deferred(&self) {
        if self.dispatcher.in_pass() {
            return;
        }
        let parked = std::mem::take(&mut *self.deferred.lock());
        for (key, status) in parked {
            self.emit(key, status);
        }
    }

    fn emit(&self, key: QueueKey, status: CompletionStatus) {
        if let Err(err) = self
            .dispatcher
            .dispatch(&Event::queue_completed(key.clone(), status))
        {
            warn!(key = %key, error = %err, "completion occurrence not dispatched");
        }
    }
}
