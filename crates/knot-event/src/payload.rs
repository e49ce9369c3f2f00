//! Typed event payloads.
//!
//! One variant per payload shape the catalog documents. Kinds that carry
//! nothing (lifecycle, idle, timer, terminal) use [`EventPayload::None`].
//! What the source system passed through a side `user_data` pointer is
//! folded into the typed structs instead: the ACK packet id lives in
//! [`PacketInfo::ack_id`], the visit count in [`ClientInfo::visits`], the
//! success/timeout flag in [`QueueCompletion::status`].

use knot_types::QueueKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of one event occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// No payload (lifecycle, idle, timer, terminal-started, external).
    None,
    /// Peer descriptor (connect/disconnect).
    Peer(PeerInfo),
    /// Packet descriptor (received / malformed / ack / logging).
    Packet(PacketInfo),
    /// Hotkey code plus the raw input buffer it came from.
    Hotkey(HotkeyInput),
    /// Deferred-callback completion descriptor.
    Queue(QueueCompletion),
    /// Stream descriptor (connect / timeout / disconnect / data).
    Stream(StreamInfo),
    /// Subscription descriptor (subscribe-ack / subscribed).
    Subscription(SubscriptionInfo),
    /// Lightweight-client descriptor (L0 proxy events).
    Client(ClientInfo),
    /// Bridged payload from the Unix-socket bridge.
    Bridge(BridgePayload),
    /// Persistent-store update notice.
    Store(StoreUpdate),
    /// Log record (log-event / log-reader).
    Log(LogRecord),
    /// Gateway-specific payload; shape owned by the gateway.
    Gateway(Value),
    /// Application-defined payload; shape owned by the application.
    App(Value),
}

impl EventPayload {
    /// Returns `true` if this is the empty payload.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Descriptor of a peer known to this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Peer name, unique within the network.
    pub name: String,
    /// Remote address.
    pub addr: String,
    /// Remote port.
    pub port: u16,
}

impl PeerInfo {
    /// Creates a peer descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, addr: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
            port,
        }
    }
}

/// Descriptor of one received packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketInfo {
    /// Name of the peer the packet came from.
    pub from: String,
    /// Command byte of the packet.
    pub command: u8,
    /// Packet body.
    pub data: Vec<u8>,
    /// Id of the acknowledged packet. Present only on ACK occurrences.
    pub ack_id: Option<u32>,
}

impl PacketInfo {
    /// Creates a plain received-packet descriptor.
    #[must_use]
    pub fn new(from: impl Into<String>, command: u8, data: Vec<u8>) -> Self {
        Self {
            from: from.into(),
            command,
            data,
            ack_id: None,
        }
    }

    /// Creates an ACK descriptor carrying the acknowledged packet id.
    #[must_use]
    pub fn ack(from: impl Into<String>, command: u8, ack_id: u32) -> Self {
        Self {
            from: from.into(),
            command,
            data: Vec::new(),
            ack_id: Some(ack_id),
        }
    }
}

/// A hotkey press with the raw buffer it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyInput {
    /// Decoded key code.
    pub key: u32,
    /// Raw keyboard input buffer.
    pub raw: Vec<u8>,
}

/// Terminal state of a deferred-callback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// The wait was resolved before its deadline.
    Succeeded,
    /// The deadline passed before resolution.
    TimedOut,
}

impl CompletionStatus {
    /// Returns `true` for [`Succeeded`](Self::Succeeded).
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Descriptor of one completed deferred-callback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCompletion {
    /// The key the wait was registered under.
    pub key: QueueKey,
    /// How the wait ended.
    pub status: CompletionStatus,
}

/// Descriptor of a stream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Peer owning the other end of the stream.
    pub peer: String,
    /// Stream name.
    pub name: String,
    /// Inbound data. Present only on stream-data occurrences.
    pub data: Option<Vec<u8>>,
}

impl StreamInfo {
    /// Creates a stream descriptor without data.
    #[must_use]
    pub fn new(peer: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            name: name.into(),
            data: None,
        }
    }

    /// Creates a stream-data descriptor.
    #[must_use]
    pub fn with_data(peer: impl Into<String>, name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            peer: peer.into(),
            name: name.into(),
            data: Some(data),
        }
    }
}

/// Descriptor of one pub/sub subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    /// Peer on the other side of the subscription.
    pub peer: String,
    /// Wire code of the subscribed event kind.
    pub event_code: u16,
}

impl SubscriptionInfo {
    /// Creates a subscription descriptor.
    #[must_use]
    pub fn new(peer: impl Into<String>, event_code: u16) -> Self {
        Self {
            peer: peer.into(),
            event_code,
        }
    }
}

/// Descriptor of a lightweight (L0) client behind the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Visit count. Present only on new-visit occurrences.
    pub visits: Option<u64>,
}

impl ClientInfo {
    /// Creates a client descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visits: None,
        }
    }

    /// Creates a new-visit descriptor with the visit count.
    #[must_use]
    pub fn visit(name: impl Into<String>, visits: u64) -> Self {
        Self {
            name: name.into(),
            visits: Some(visits),
        }
    }
}

/// Payload bridged in over the Unix-domain-socket bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgePayload {
    /// Raw bridged bytes.
    pub data: Vec<u8>,
    /// Opaque bridge connection handle.
    pub handle: u64,
}

/// Notice that the persistent store changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUpdate {
    /// Updated key, when the store reports one.
    pub key: Option<String>,
}

/// One log record flowing through the logging events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Producing host or subsystem.
    pub source: String,
    /// Log line.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_descriptor_carries_packet_id() {
        let ack = PacketInfo::ack("relay-2", 0x41, 17);
        assert_eq!(ack.ack_id, Some(17));
        assert!(ack.data.is_empty());

        let plain = PacketInfo::new("relay-2", 0x41, vec![1, 2, 3]);
        assert_eq!(plain.ack_id, None);
    }

    #[test]
    fn completion_status_flag() {
        assert!(CompletionStatus::Succeeded.is_success());
        assert!(!CompletionStatus::TimedOut.is_success());
    }

    #[test]
    fn subscription_descriptor() {
        let sub = SubscriptionInfo::new("relay-2", 20);
        assert_eq!(sub.peer, "relay-2");
        assert_eq!(sub.event_code, 20);
    }

    #[test]
    fn visit_descriptor_carries_count() {
        assert_eq!(ClientInfo::new("c1").visits, None);
        assert_eq!(ClientInfo::visit("c1", 4).visits, Some(4));
    }

    #[test]
    fn stream_data_is_optional() {
        assert!(StreamInfo::new("peer", "s0").data.is_none());
        assert_eq!(
            StreamInfo::with_data("peer", "s0", vec![9]).data,
            Some(vec![9])
        );
    }

    #[test]
    fn payload_serde_round_trip() {
        let payload = EventPayload::Queue(QueueCompletion {
            key: QueueKey::from("pkt-7"),
            status: CompletionStatus::TimedOut,
        });
        let json = serde_json::to_string(&payload).unwrap();
        let back: EventPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
