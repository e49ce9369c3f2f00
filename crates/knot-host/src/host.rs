//! Host lifecycle controller.
//!
//! Owns the dispatcher, the deferred callback queue and the idle
//! monitor, and brackets their lifetime with the started/stopping/
//! stopped occurrences:
//!
//! ```text
//! NotStarted ──start()──► Running ──stop()──► StoppingRequested ──► Stopped
//!                │                     │                              │
//!                ▼                     ▼                              ▼
//!             Started              Stopping                        Stopped
//!           (after wiring)   (observers may flush)        (then dispatcher sealed)
//! ```
//!
//! No occurrence is dispatched after `Stopped`: the dispatcher is
//! sealed and every later dispatch or registration reports
//! [`HostError::Stopped`] to its caller.

use crate::config::HostConfig;
use crate::cque::CallbackQueue;
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::error::{HostError, ObserverError};
use crate::monitor::IdleMonitor;
use knot_event::Event;
use knot_types::ObserverId;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Host lifecycle states.
///
/// Transitions only move forward; a stopped host is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// Constructed, not yet started.
    NotStarted,
    /// Started occurrence dispatched; ticker running.
    Running,
    /// Stop requested; observers are flushing.
    StoppingRequested,
    /// Fully stopped; dispatcher sealed.
    Stopped,
}

impl std::fmt::Display for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The event dispatch and deferred-callback core of one host process.
///
/// Producers (transport, stream layer, proxy, terminal) hand
/// occurrences to [`submit`](Self::submit); consumers register
/// observers via [`observe`](Self::observe). A background ticker task
/// drives the idle monitor and the queue sweep at the configured tick
/// interval.
///
/// # Example
///
/// ```no_run
/// use knot_event::{Event, PacketInfo};
/// use knot_host::{Host, HostConfig};
///
/// # async fn run() -> Result<(), knot_host::HostError> {
/// let host = Host::new(HostConfig::default());
/// host.observe(|event| {
///     println!("{}", event.kind);
///     Ok(())
/// })?;
///
/// host.start().await?;
/// host.submit(&Event::received(PacketInfo::new("relay-2", 0x41, vec![1])))?;
/// host.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Host {
    config: HostConfig,
    dispatcher: Arc<Dispatcher>,
    queue: Arc<CallbackQueue>,
    monitor: Arc<IdleMonitor>,
    state: Mutex<HostState>,
    ticker: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Host {
    /// Wires a host core from `config`. Nothing runs until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(config: HostConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let queue = Arc::new(CallbackQueue::new(Arc::clone(&dispatcher)));
        let monitor = Arc::new(IdleMonitor::new(
            Arc::clone(&dispatcher),
            config.idle_threshold(),
            Instant::now(),
        ));
        Self {
            config,
            dispatcher,
            queue,
            monitor,
            state: Mutex::new(HostState::NotStarted),
            ticker: Mutex::new(None),
        }
    }

    /// Returns the host configuration.
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Returns the deferred callback queue.
    #[must_use]
    pub fn queue(&self) -> &Arc<CallbackQueue> {
        &self.queue
    }

    /// Returns the idle monitor.
    #[must_use]
    pub fn monitor(&self) -> &Arc<IdleMonitor> {
        &self.monitor
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> HostState {
        *self.state.lock()
    }

    /// Registers an observer; shorthand for the dispatcher's register.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Stopped`] after the host has stopped.
    pub fn observe<F>(&self, callback: F) -> Result<ObserverId, HostError>
    where
        F: FnMut(&Event) -> Result<(), ObserverError> + Send + 'static,
    {
        self.dispatcher.register(callback)
    }

    /// Submits one occurrence from a producer.
    ///
    /// Dispatches on the calling thread and, for I/O-activity kinds,
    /// refreshes the idle clock.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotRunning`] before start and
    /// [`HostError::Stopped`] after stop, so producers can detect
    /// shutdown races instead of losing occurrences silently.
    pub fn submit(&self, event: &Event) -> Result<DispatchReport, HostError> {
        match self.state() {
            HostState::Running | HostState::StoppingRequested => {}
            HostState::NotStarted => return Err(HostError::NotRunning),
            HostState::Stopped => return Err(HostError::Stopped),
        }
        if event.kind.is_io_activity() {
            self.monitor.note_activity(Instant::now());
        }
        self.dispatcher.dispatch(event)
    }

    /// Starts the host: dispatches Started and spawns the ticker task.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidTransition`] unless the host is in
    /// `NotStarted`.
    pub async fn start(&self) -> Result<(), HostError> {
        {
            let mut state = self.state.lock();
            if *state != HostState::NotStarted {
                return Err(HostError::InvalidTransition {
                    from: *state,
                    to: HostState::Running,
                });
            }
            *state = HostState::Running;
        }
        info!(
            tick_ms = self.config.tick_interval_ms,
            idle_ms = self.config.idle_threshold_ms,
            "host starting"
        );
        self.dispatcher.dispatch(&Event::started())?;

        let monitor = Arc::clone(&self.monitor);
        let queue = Arc::clone(&self.queue);
        let tick = self.config.tick_interval();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first interval tick completes immediately; skip it so
            // the first Timer occurrence fires one tick after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                let now = Instant::now();
                if monitor.tick(now).is_err() {
                    break;
                }
                let timed_out = queue.sweep(now);
                if timed_out > 0 {
                    debug!(timed_out, "queue sweep");
                }
            }
        });
        *self.ticker.lock() = Some(handle);
        Ok(())
    }

    /// Stops the host: dispatches Stopping, tears components down,
    /// dispatches Stopped, then seals the dispatcher.
    ///
    /// Observers get the Stopping occurrence before any teardown, so
    /// they can flush state. Pending deferred waits are dropped without
    /// completing.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidTransition`] unless the host is in
    /// `Running`.
    pub async fn stop(&self) -> Result<(), HostError> {
        {
            let mut state = self.state.lock();
            if *state != HostState::Running {
                return Err(HostError::InvalidTransition {
                    from: *state,
                    to: HostState::StoppingRequested,
                });
            }
            *state = HostState::StoppingRequested;
        }
        info!("host stopping");
        self.dispatcher.dispatch(&Event::stopping())?;

        let handle = self.ticker.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
        self.queue.clear();

        self.dispatcher.dispatch(&Event::stopped())?;
        self.dispatcher.seal();
        *self.state.lock() = HostState::Stopped;
        info!("host stopped");
        Ok(())
    }
}
