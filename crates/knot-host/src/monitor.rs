//! Idle/timer monitor.
//!
//! On every tick the monitor raises a Timer occurrence. Separately, once
//! the host has been quiet for longer than the configured idle
//! threshold, it raises a single Idle occurrence — and stays silent
//! until new activity re-arms it. Idle never re-fires tick after tick
//! while the same quiet period persists.
//!
//! The monitor is driven with an explicit clock (`tick(now)`), so the
//! host's ticker task and the tests share one code path.

use crate::dispatcher::Dispatcher;
use crate::error::HostError;
use knot_event::Event;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

struct IdleState {
    last_activity: Instant,
    idle_fired: bool,
}

/// Periodic timer and idle detection.
pub struct IdleMonitor {
    dispatcher: Arc<Dispatcher>,
    idle_threshold: Duration,
    state: Mutex<IdleState>,
}

impl IdleMonitor {
    /// Creates a monitor armed at `now` with the given quiet threshold.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, idle_threshold: Duration, now: Instant) -> Self {
        Self {
            dispatcher,
            idle_threshold,
            state: Mutex::new(IdleState {
                last_activity: now,
                idle_fired: false,
            }),
        }
    }

    /// Records host I/O activity at `now` and re-arms idle detection.
    pub fn note_activity(&self, now: Instant) {
        let mut state = self.state.lock();
        state.last_activity = now;
        state.idle_fired = false;
    }

    /// Returns how long the host has been quiet as of `now`.
    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.state.lock().last_activity)
    }

    /// Runs one monitor tick at `now`.
    ///
    /// Raises Timer unconditionally, then Idle if the quiet period
    /// strictly exceeds the threshold and Idle has not fired since the
    /// last activity.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Stopped`] once the dispatcher is sealed; the
    /// ticker task uses this to shut itself down.
    pub fn tick(&self, now: Instant) -> Result<(), HostError> {
        self.dispatcher.dispatch(&Event::timer())?;

        // Decide under the lock, dispatch after dropping it: observers
        // may call note_activity from their callbacks.
        let fire_idle = {
            let mut state = self.state.lock();
            let quiet = now.saturating_duration_since(state.last_activity);
            if quiet > self.idle_threshold && !state.idle_fired {
                state.idle_fired = true;
                true
            } else {
                false
            }
        };

        if fire_idle {
            debug!(threshold_ms = self.idle_threshold.as_millis() as u64, "host idle");
            self.dispatcher.dispatch(&Event::idle())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knot_event::EventKind;
    use parking_lot::Mutex as PlMutex;

    fn monitor_with_log(
        threshold: Duration,
        t0: Instant,
    ) -> (IdleMonitor, Arc<PlMutex<Vec<EventKind>>>) {
        let dispatcher = Arc::new(Dispatcher::new());
        let seen = Arc::new(PlMutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        dispatcher
            .register(move |event| {
                seen2.lock().push(event.kind);
                Ok(())
            })
            .unwrap();
        (IdleMonitor::new(dispatcher, threshold, t0), seen)
    }

    fn idle_count(seen: &PlMutex<Vec<EventKind>>) -> usize {
        seen.lock().iter().filter(|k| **k == EventKind::Idle).count()
    }

    #[test]
    fn timer_fires_every_tick() {
        let t0 = Instant::now();
        let (monitor, seen) = monitor_with_log(Duration::from_secs(5), t0);

        for s in 1..=3 {
            monitor.tick(t0 + Duration::from_secs(s)).unwrap();
        }
        let timers = seen
            .lock()
            .iter()
            .filter(|k| **k == EventKind::Timer)
            .count();
        assert_eq!(timers, 3);
    }

    #[test]
    fn idle_fires_once_after_threshold_crossing() {
        let t0 = Instant::now();
        let (monitor, seen) = monitor_with_log(Duration::from_secs(5), t0);

        // Within the threshold: no idle.
        for s in 1..=4 {
            monitor.tick(t0 + Duration::from_secs(s)).unwrap();
        }
        assert_eq!(idle_count(&seen), 0);

        // Past the threshold: exactly one idle.
        monitor.tick(t0 + Duration::from_secs(6)).unwrap();
        assert_eq!(idle_count(&seen), 1);

        // Still quiet: no second idle.
        monitor.tick(t0 + Duration::from_secs(7)).unwrap();
        assert_eq!(idle_count(&seen), 1);
    }

    #[test]
    fn activity_rearms_idle() {
        let t0 = Instant::now();
        let (monitor, seen) = monitor_with_log(Duration::from_secs(5), t0);

        monitor.tick(t0 + Duration::from_secs(6)).unwrap();
        assert_eq!(idle_count(&seen), 1);

        monitor.note_activity(t0 + Duration::from_secs(8));
        monitor.tick(t0 + Duration::from_secs(9)).unwrap();
        assert_eq!(idle_count(&seen), 1);

        // Quiet again past the threshold from the new activity.
        monitor.tick(t0 + Duration::from_secs(14)).unwrap();
        assert_eq!(idle_count(&seen), 2);
    }

    #[test]
    fn exact_threshold_does_not_fire() {
        let t0 = Instant::now();
        let (monitor, seen) = monitor_with_log(Duration::from_secs(5), t0);

        // "Exceeds" is strict: exactly at the threshold is not idle yet.
        monitor.tick(t0 + Duration::from_secs(5)).unwrap();
        assert_eq!(idle_count(&seen), 0);
    }

    #[test]
    fn idle_for_tracks_last_activity() {
        let t0 = Instant::now();
        let (monitor, _seen) = monitor_with_log(Duration::from_secs(5), t0);

        assert_eq!(monitor.idle_for(t0 + Duration::from_secs(3)), Duration::from_secs(3));
        monitor.note_activity(t0 + Duration::from_secs(4));
        assert_eq!(monitor.idle_for(t0 + Duration::from_secs(6)), Duration::from_secs(2));
    }
}
