//! Event catalog for the knot host.
//!
//! This crate defines the closed set of things that can happen inside a
//! knot host — peer connections, received data, timers, deferred-wait
//! completions — and the payload each of them carries. The host runtime
//! (`knot-host`) funnels every occurrence through a single dispatcher;
//! producers (transport, stream layer, L0 proxy, terminal) construct the
//! [`Event`] envelope defined here.
//!
//! # Catalog Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Producers                          │
//! │   transport   streams   L0 proxy   terminal   timers     │
//! └──────────────────────────────────────────────────────────┘
//!                   │ Event { kind, payload }
//!                   ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 knot-host Dispatcher                     │
//! │   fan-out, in registration order, exactly once           │
//! └──────────────────────────────────────────────────────────┘
//!                   │
//!                   ▼
//!               Observers
//! ```
//!
//! # Wire Codes
//!
//! Every [`EventKind`] has a stable `u16` wire code. The catalog is
//! additive-only: codes are never renumbered or reused, because external
//! encodings of events rely on them. Application-defined kinds live at
//! [`APP_KIND_BASE`] (`0x8000`) and above, so core kinds can keep growing
//! below without collisions.
//!
//! # Typed Payloads
//!
//! Payloads are a tagged union ([`EventPayload`]) instead of a raw
//! pointer + length pair: observers get compile-time-checked shapes, and
//! the per-kind contract is enforceable via [`Event::validate`].
//!
//! # Example
//!
//! ```
//! use knot_event::{Event, EventKind, PeerInfo};
//!
//! let event = Event::peer_connected(PeerInfo::new("relay-2", "10.0.0.7", 9010));
//! assert_eq!(event.kind, EventKind::PeerConnected);
//! assert_eq!(event.kind.code(), 3);
//! assert!(event.validate().is_ok());
//! ```

mod catalog;
mod error;
mod event;
mod payload;

pub use catalog::{EventFamily, EventKind, APP_KIND_BASE};
pub use error::CatalogError;
pub use event::Event;
pub use payload::{
    BridgePayload, ClientInfo, CompletionStatus, EventPayload, HotkeyInput, LogRecord, PacketInfo,
    PeerInfo, QueueCompletion, StoreUpdate, StreamInfo, SubscriptionInfo,
};

// Re-export for convenience: completion keys appear in most payloads
// consumers match on.
pub use knot_types::QueueKey;
