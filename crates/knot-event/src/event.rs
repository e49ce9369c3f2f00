//! The event envelope.
//!
//! One [`Event`] is one concrete occurrence: a kind from the catalog and
//! the payload the catalog documents for it. The envelope is immutable
//! once constructed; the dispatcher borrows it for the duration of one
//! fan-out pass.

use crate::catalog::{EventFamily, EventKind};
use crate::error::CatalogError;
use crate::payload::{
    BridgePayload, ClientInfo, CompletionStatus, EventPayload, HotkeyInput, LogRecord, PacketInfo,
    PeerInfo, QueueCompletion, StoreUpdate, StreamInfo, SubscriptionInfo,
};
use knot_types::QueueKey;
use serde::{Deserialize, Serialize};

/// One concrete occurrence of an [`EventKind`].
///
/// # Payload Contract
///
/// Constructors produce envelopes that satisfy the per-kind payload
/// contract. Envelopes built by hand (or decoded from elsewhere) can be
/// checked with [`validate`](Self::validate).
///
/// # Example
///
/// ```
/// use knot_event::{Event, EventKind, EventPayload, PeerInfo};
///
/// let event = Event::peer_connected(PeerInfo::new("relay-2", "10.0.0.7", 9010));
/// assert_eq!(event.kind, EventKind::PeerConnected);
/// assert!(matches!(event.payload, EventPayload::Peer(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// What it carries.
    pub payload: EventPayload,
}

impl Event {
    /// Creates an envelope without checking the payload contract.
    ///
    /// Prefer the kind-specific constructors; use [`validate`](Self::validate)
    /// when accepting envelopes from outside.
    #[must_use]
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        Self { kind, payload }
    }

    /// Host started.
    #[must_use]
    pub fn started() -> Self {
        Self::new(EventKind::Started, EventPayload::None)
    }

    /// Host about to stop.
    #[must_use]
    pub fn stopping() -> Self {
        Self::new(EventKind::Stopping, EventPayload::None)
    }

    /// Host stopped.
    #[must_use]
    pub fn stopped() -> Self {
        Self::new(EventKind::Stopped, EventPayload::None)
    }

    /// Peer connected.
    #[must_use]
    pub fn peer_connected(peer: PeerInfo) -> Self {
        Self::new(EventKind::PeerConnected, EventPayload::Peer(peer))
    }

    /// Peer disconnected.
    #[must_use]
    pub fn peer_disconnected(peer: PeerInfo) -> Self {
        Self::new(EventKind::PeerDisconnected, EventPayload::Peer(peer))
    }

    /// Data received.
    #[must_use]
    pub fn received(packet: PacketInfo) -> Self {
        Self::new(EventKind::Received, EventPayload::Packet(packet))
    }

    /// Malformed packet received.
    #[must_use]
    pub fn received_malformed(packet: PacketInfo) -> Self {
        Self::new(EventKind::ReceivedMalformed, EventPayload::Packet(packet))
    }

    /// ACK received for previously sent data.
    #[must_use]
    pub fn received_ack(packet: PacketInfo) -> Self {
        Self::new(EventKind::ReceivedAck, EventPayload::Packet(packet))
    }

    /// Quiet period exceeded.
    #[must_use]
    pub fn idle() -> Self {
        Self::new(EventKind::Idle, EventPayload::None)
    }

    /// Monitor tick.
    #[must_use]
    pub fn timer() -> Self {
        Self::new(EventKind::Timer, EventPayload::None)
    }

    /// Hotkey pressed.
    #[must_use]
    pub fn hotkey(input: HotkeyInput) -> Self {
        Self::new(EventKind::Hotkey, EventPayload::Hotkey(input))
    }

    /// Terminal started.
    #[must_use]
    pub fn terminal_started() -> Self {
        Self::new(EventKind::TerminalStarted, EventPayload::None)
    }

    /// Deferred-callback entry completed.
    #[must_use]
    pub fn queue_completed(key: QueueKey, status: CompletionStatus) -> Self {
        Self::new(
            EventKind::QueueCompleted,
            EventPayload::Queue(QueueCompletion { key, status }),
        )
    }

    /// Stream connected.
    #[must_use]
    pub fn stream_connected(stream: StreamInfo) -> Self {
        Self::new(EventKind::StreamConnected, EventPayload::Stream(stream))
    }

    /// Stream connection attempt timed out.
    #[must_use]
    pub fn stream_connect_timeout(stream: StreamInfo) -> Self {
        Self::new(EventKind::StreamConnectTimeout, EventPayload::Stream(stream))
    }

    /// Stream disconnected.
    #[must_use]
    pub fn stream_disconnected(stream: StreamInfo) -> Self {
        Self::new(EventKind::StreamDisconnected, EventPayload::Stream(stream))
    }

    /// Stream has inbound data.
    #[must_use]
    pub fn stream_data(stream: StreamInfo) -> Self {
        Self::new(EventKind::StreamData, EventPayload::Stream(stream))
    }

    /// Subscribe answer received from a peer.
    #[must_use]
    pub fn subscribe_ack(subscription: SubscriptionInfo) -> Self {
        Self::new(
            EventKind::SubscribeAck,
            EventPayload::Subscription(subscription),
        )
    }

    /// A peer subscribed to an event at this host.
    #[must_use]
    pub fn subscribed(subscription: SubscriptionInfo) -> Self {
        Self::new(
            EventKind::Subscribed,
            EventPayload::Subscription(subscription),
        )
    }

    /// Lightweight client connected through the proxy.
    #[must_use]
    pub fn l0_connected(client: ClientInfo) -> Self {
        Self::new(EventKind::L0Connected, EventPayload::Client(client))
    }

    /// Lightweight client disconnected.
    #[must_use]
    pub fn l0_disconnected(client: ClientInfo) -> Self {
        Self::new(EventKind::L0Disconnected, EventPayload::Client(client))
    }

    /// Lightweight client new-visit notification.
    #[must_use]
    pub fn l0_new_visit(client: ClientInfo) -> Self {
        Self::new(EventKind::L0NewVisit, EventPayload::Client(client))
    }

    /// Gateway occurrence with its gateway-owned payload.
    #[must_use]
    pub fn gateway(payload: serde_json::Value) -> Self {
        Self::new(EventKind::Gateway, EventPayload::Gateway(payload))
    }

    /// Data received over the Unix-socket bridge.
    #[must_use]
    pub fn bridge_received(bridge: BridgePayload) -> Self {
        Self::new(EventKind::BridgeReceived, EventPayload::Bridge(bridge))
    }

    /// Persistent store updated.
    #[must_use]
    pub fn store_updated(update: StoreUpdate) -> Self {
        Self::new(EventKind::StoreUpdated, EventPayload::Store(update))
    }

    /// External interval tick.
    #[must_use]
    pub fn external_interval() -> Self {
        Self::new(EventKind::ExternalInterval, EventPayload::None)
    }

    /// Logging server event.
    #[must_use]
    pub fn log_event(record: LogRecord) -> Self {
        Self::new(EventKind::LogEvent, EventPayload::Log(record))
    }

    /// Log reader produced data.
    #[must_use]
    pub fn log_reader(record: LogRecord) -> Self {
        Self::new(EventKind::LogReader, EventPayload::Log(record))
    }

    /// Application-defined occurrence at `APP_KIND_BASE + offset`.
    #[must_use]
    pub fn app(offset: u16, payload: serde_json::Value) -> Self {
        Self::new(EventKind::App(offset), EventPayload::App(payload))
    }

    /// Checks the payload against the kind's documented contract.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PayloadMismatch`] when the payload variant
    /// does not match what the catalog documents for `self.kind`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let ok = match self.kind.family() {
            EventFamily::Lifecycle
            | EventFamily::Health
            | EventFamily::Terminal
            | EventFamily::External => self.payload.is_none(),
            EventFamily::Connection => matches!(self.payload, EventPayload::Peer(_)),
            EventFamily::Data => matches!(self.payload, EventPayload::Packet(_)),
            EventFamily::Input => matches!(
                self.payload,
                EventPayload::Hotkey(_) | EventPayload::App(_) | EventPayload::None
            ),
            EventFamily::Queue => matches!(self.payload, EventPayload::Queue(_)),
            EventFamily::Stream => matches!(self.payload, EventPayload::Stream(_)),
            EventFamily::PubSub => matches!(self.payload, EventPayload::Subscription(_)),
            EventFamily::Proxy => matches!(self.payload, EventPayload::Client(_)),
            EventFamily::Gateway => matches!(self.payload, EventPayload::Gateway(_)),
            EventFamily::Bridge => matches!(self.payload, EventPayload::Bridge(_)),
            EventFamily::Store => {
                matches!(self.payload, EventPayload::Store(_) | EventPayload::None)
            }
            EventFamily::Logging => {
                matches!(self.payload, EventPayload::Log(_) | EventPayload::Packet(_))
            }
            EventFamily::App => true,
        };
        if ok {
            Ok(())
        } else {
            Err(CatalogError::PayloadMismatch { kind: self.kind })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_satisfy_contract() {
        let events = vec![
            Event::started(),
            Event::stopping(),
            Event::stopped(),
            Event::peer_connected(PeerInfo::new("p", "127.0.0.1", 9010)),
            Event::received(PacketInfo::new("p", 1, vec![0])),
            Event::received_ack(PacketInfo::ack("p", 1, 7)),
            Event::idle(),
            Event::timer(),
            Event::hotkey(HotkeyInput { key: 112, raw: vec![112] }),
            Event::terminal_started(),
            Event::queue_completed(QueueKey::from("pkt-7"), CompletionStatus::Succeeded),
            Event::stream_connected(StreamInfo::new("p", "s0")),
            Event::stream_connect_timeout(StreamInfo::new("p", "s0")),
            Event::stream_disconnected(StreamInfo::new("p", "s0")),
            Event::stream_data(StreamInfo::with_data("p", "s0", vec![1])),
            Event::subscribe_ack(SubscriptionInfo::new("p", 20)),
            Event::subscribed(SubscriptionInfo::new("p", 20)),
            Event::l0_connected(ClientInfo::new("c")),
            Event::l0_disconnected(ClientInfo::new("c")),
            Event::l0_new_visit(ClientInfo::visit("c", 3)),
            Event::gateway(serde_json::json!({"route": "/ws"})),
            Event::bridge_received(BridgePayload {
                data: vec![1],
                handle: 3,
            }),
            Event::store_updated(StoreUpdate {
                key: Some("peers".into()),
            }),
            Event::external_interval(),
            Event::log_event(LogRecord {
                source: "host".into(),
                message: "up".into(),
            }),
            Event::log_reader(LogRecord {
                source: "reader".into(),
                message: "line".into(),
            }),
            Event::app(0x10, serde_json::json!({"x": 1})),
        ];
        for event in events {
            assert!(event.validate().is_ok(), "contract violated: {event:?}");
        }
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let bad = Event::new(
            EventKind::PeerConnected,
            EventPayload::Queue(QueueCompletion {
                key: QueueKey::from("x"),
                status: CompletionStatus::Succeeded,
            }),
        );
        let err = bad.validate().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PayloadMismatch {
                kind: EventKind::PeerConnected
            }
        ));
    }

    #[test]
    fn lifecycle_kinds_take_no_payload() {
        let bad = Event::new(
            EventKind::Stopped,
            EventPayload::Peer(PeerInfo::new("p", "a", 1)),
        );
        assert!(bad.validate().is_err());
    }

    #[test]
    fn logging_accepts_packet_shape() {
        // Logging-server events arrive with the received-packet shape.
        let log = Event::new(
            EventKind::LogEvent,
            EventPayload::Packet(PacketInfo::new("logger", 0, vec![])),
        );
        assert!(log.validate().is_ok());
    }

    #[test]
    fn event_serde_round_trip() {
        let event = Event::queue_completed(QueueKey::from("pkt-9"), CompletionStatus::TimedOut);
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
