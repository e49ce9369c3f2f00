//! Callback registry.
//!
//! Ordered list of observers subscribed to every dispatched occurrence.
//! Registration order is delivery order. Both operations are safe to
//! call at any time, including from inside an observer callback during
//! an active fan-out pass:
//!
//! - a registration made during a pass is appended after the pass's
//!   snapshot, so the new observer sees only later occurrences;
//! - an unregistration made during a pass takes effect on the next pass;
//!   the in-flight snapshot still completes.

use crate::error::ObserverError;
use knot_event::Event;
use knot_types::ObserverId;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Observer callback signature.
///
/// Receives each dispatched occurrence by reference. An `Err` return is
/// an observer failure: logged and reported by the dispatcher, never
/// fatal to the pass.
pub type ObserverFn = dyn FnMut(&Event) -> Result<(), ObserverError> + Send;

struct Entry {
    id: ObserverId,
    // One lock per callback: a pass invokes callbacks with the entry
    // list unlocked, so callbacks can re-enter register/unregister.
    callback: Arc<Mutex<Box<ObserverFn>>>,
}

/// Insertion-ordered observer registry.
pub struct Registry {
    entries: Mutex<Vec<Entry>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends an observer and returns its handle.
    pub fn register<F>(&self, callback: F) -> ObserverId
    where
        F: FnMut(&Event) -> Result<(), ObserverError> + Send + 'static,
    {
        let id = ObserverId::new();
        self.entries.lock().push(Entry {
            id,
            callback: Arc::new(Mutex::new(Box::new(callback))),
        });
        debug!(observer = %id, "observer registered");
        id
    }

    /// Removes an observer by handle.
    ///
    /// Unregistering an already-removed handle is a no-op.
    pub fn unregister(&self, id: ObserverId) {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() < before {
            debug!(observer = %id, "observer unregistered");
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clones the current entry list for one fan-out pass.
    ///
    /// The entry lock is released before any callback runs, so the
    /// snapshot stays stable while callbacks mutate the registry.
    pub(crate) fn snapshot(&self) -> Vec<(ObserverId, Arc<Mutex<Box<ObserverFn>>>)> {
        self.entries
            .lock()
            .iter()
            .map(|entry| (entry.id, Arc::clone(&entry.callback)))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
