//! Event dispatcher.
//!
//! The single point every occurrence funnels through:
//!
//! ```text
//! producers ──► dispatch(event) ──► fan-out lock ──► observers,
//!                                                    in registration order
//! ```
//!
//! One fan-out pass at a time: `dispatch` is serialized by an exclusive
//! lock, so observer callbacks never run concurrently with each other
//! for the same dispatcher. Observers may mutate shared state without
//! their own locking because of this guarantee.
//!
//! A failing observer does not abort the pass. The failure is logged and
//! recorded in the [`DispatchReport`]; delivery continues to the
//! remaining observers. Failures are never re-dispatched as events.

use crate::error::{HostError, ObserverError};
use crate::registry::Registry;
use knot_event::Event;
use knot_types::ObserverId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

/// Outcome of one fan-out pass.
#[derive(Debug)]
pub struct DispatchReport {
    /// Observers the occurrence was delivered to.
    pub delivered: usize,
    /// Observers that returned an error, with their failures.
    pub failures: Vec<(ObserverId, ObserverError)>,
}

impl DispatchReport {
    /// Returns `true` if every observer handled the occurrence cleanly.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Synchronous fan-out dispatcher.
///
/// # Re-entrancy
///
/// `dispatch` must not be called from inside an observer callback: the
/// fan-out lock is not re-entrant. Observers that need to produce new
/// occurrences hand them to a producer-side path (e.g. the host's
/// submit) after their callback returns. Resolving a deferred wait from
/// inside a callback is supported: the queue runs the continuation
/// immediately and parks the completion occurrence for the next tick
/// instead of re-entering the running pass. Registry mutation from
/// inside a callback is fully supported.
pub struct Dispatcher {
    registry: Registry,
    // Serializes fan-out passes; also the thread-safe submission path.
    fan_out: Mutex<()>,
    // Thread currently inside a fan-out pass, if any. Lets collaborators
    // detect that dispatching here would re-enter the pass lock.
    pass_owner: Mutex<Option<ThreadId>>,
    sealed: AtomicBool,
}

struct ClearPassOwner<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for ClearPassOwner<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}

impl Dispatcher {
    /// Creates a dispatcher with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            fan_out: Mutex::new(()),
            pass_owner: Mutex::new(None),
            sealed: AtomicBool::new(false),
        }
    }

    /// Registers an observer for every subsequently dispatched occurrence.
    ///
    /// Safe to call from inside an observer callback; the new observer
    /// sees only occurrences dispatched after its registration.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Stopped`] after the host has stopped —
    /// reported rather than dropped, so callers can detect the shutdown
    /// race.
    pub fn register<F>(&self, callback: F) -> Result<ObserverId, HostError>
    where
        F: FnMut(&Event) -> Result<(), ObserverError> + Send + 'static,
    {
        if self.sealed.load(Ordering::Acquire) {
            return Err(HostError::Stopped);
        }
        Ok(self.registry.register(callback))
    }

    /// Removes an observer.
    ///
    /// No-op for unknown handles. After this returns, the observer
    /// receives no occurrence from any pass that has not yet taken its
    /// snapshot; an in-flight pass may still deliver one last occurrence.
    pub fn unregister(&self, id: ObserverId) {
        self.registry.unregister(id);
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.len()
    }

    /// Delivers one occurrence to every registered observer, in
    /// registration order, on the calling thread.
    ///
    /// Never blocks on I/O; anything slow belongs in the observer's own
    /// async machinery, signaled back later (e.g. through the deferred
    /// callback queue).
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Stopped`] after the host has stopped.
    pub fn dispatch(&self, event: &Event) -> Result<DispatchReport, HostError> {
        if self.sealed.load(Ordering::Acquire) {
            return Err(HostError::Stopped);
        }
        let _pass = self.fan_out.lock();
        *self.pass_owner.lock() = Some(thread::current().id());
        let _owner = ClearPassOwner(&self.pass_owner);

        let snapshot = self.registry.snapshot();
        let mut report = DispatchReport {
            delivered: 0,
            failures: Vec::new(),
        };
        for (id, callback) in snapshot {
            let mut callback = callback.lock();
            report.delivered += 1;
            if let Err(err) = (*callback)(event) {
                warn!(
                    observer = %id,
                    kind = %event.kind,
                    error = %err,
                    "observer failed during dispatch"
                );
                report.failures.push((id, err));
            }
        }
        debug!(kind = %event.kind, delivered = report.delivered, "dispatched");
        Ok(report)
    }

    /// Returns `true` while the calling thread is inside a fan-out pass
    /// of this dispatcher.
    pub(crate) fn in_pass(&self) -> bool {
        *self.pass_owner.lock() == Some(thread::current().id())
    }

    /// Seals the dispatcher: every later `dispatch` or `register` fails
    /// with [`HostError::Stopped`]. An in-flight pass completes; no new
    /// pass starts.
    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Returns `true` once the dispatcher has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
