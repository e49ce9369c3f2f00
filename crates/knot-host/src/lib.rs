//! Event dispatch and deferred-callback core for a knot host.
//!
//! A knot host maintains peer connections, streams and timers, and
//! notifies registered observers of everything that happens using the
//! closed catalog defined in `knot-event`. This crate is the core that
//! sits in the middle:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Producers (external collaborators)                          │
//! │  transport · streams · L0 proxy · terminal · gateway · ...   │
//! └──────────────────────────────────────────────────────────────┘
//!                   │ Host::submit(event)
//!                   ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Host                                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Dispatcher  - one fan-out pass at a time,             │  │
//! │  │                registration order, exactly once        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │  ┌──────────────────────┐  ┌────────────────────────────┐    │
//! │  │  CallbackQueue       │  │  IdleMonitor               │    │
//! │  │  keyed waits with    │  │  Timer every tick,         │    │
//! │  │  deadlines           │  │  Idle once per quiet spell │    │
//! │  └──────────────────────┘  └────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//!                   │
//!                   ▼
//!               Observers
//! ```
//!
//! # Delivery Guarantees
//!
//! - Fan-out is synchronous, on the submitting thread, serialized by an
//!   exclusive lock: observer callbacks never run concurrently with
//!   each other for the same dispatcher.
//! - Every observer present when a pass starts receives exactly one
//!   invocation for that occurrence, in registration order, regardless
//!   of registry mutations it performs during the pass.
//! - A failing observer never aborts a pass; failures are logged and
//!   reported in the [`DispatchReport`].
//! - After the host reaches `Stopped`, dispatch and registration report
//!   [`HostError::Stopped`] instead of silently dropping.
//!
//! # Deferred Waits
//!
//! The [`CallbackQueue`] turns "tell me later" into a uniform
//! QueueCompleted occurrence: register a key with a deadline, then
//! either a resolve (success) or the periodic sweep (timeout) completes
//! it, exactly once. The sweep runs once per monitor tick, so timeout
//! latency is bounded by the deadline plus one tick width. A wait
//! resolved from inside an observer callback completes immediately; its
//! QueueCompleted occurrence is emitted on the next tick.
//!
//! # Main Types
//!
//! - [`Host`] - lifecycle controller and producer-facing surface
//! - [`Dispatcher`] - synchronous fan-out pump
//! - [`Registry`] - ordered observer registry
//! - [`CallbackQueue`] - keyed deferred waits with deadlines
//! - [`IdleMonitor`] - timer ticks and idle detection
//! - [`HostConfig`] - thresholds and tick width
//! - [`HostError`] - host layer errors (implements `ErrorCode`)

mod config;
mod cque;
mod dispatcher;
mod error;
mod host;
mod monitor;
mod registry;

pub use config::{HostConfig, DEFAULT_IDLE_THRESHOLD_MS, DEFAULT_TICK_INTERVAL_MS};
pub use cque::{CallbackQueue, CompleteFn, Ticket};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{HostError, ObserverError};
pub use host::{Host, HostState};
pub use monitor::IdleMonitor;
pub use registry::{ObserverFn, Registry};
