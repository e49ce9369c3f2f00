//! The closed, additive-only catalog of event kinds.
//!
//! Core kinds occupy wire codes `0..=29`; application-defined kinds start
//! at [`APP_KIND_BASE`]. Adding a kind never renumbers an existing one.
//!
//! | Family | Kinds | Codes |
//! |--------|-------|-------|
//! | Lifecycle | Started, Stopping, Stopped | 0-2 |
//! | Connection | PeerConnected, PeerDisconnected | 3-4 |
//! | Data | Received, ReceivedMalformed, ReceivedAck | 5-7 |
//! | Health | Idle, Timer | 8-9 |
//! | Input | Hotkey, User, Async | 10-12 |
//! | Terminal | TerminalStarted | 13 |
//! | Queue | QueueCompleted | 14 |
//! | Stream | StreamConnected, StreamConnectTimeout, StreamDisconnected, StreamData | 15-18 |
//! | PubSub | SubscribeAck, Subscribed | 19-20 |
//! | Proxy | L0Connected, L0Disconnected, L0NewVisit | 21-23 |
//! | Gateway | Gateway | 24 |
//! | Bridge | BridgeReceived | 25 |
//! | Store | StoreUpdated | 26 |
//! | External | ExternalInterval | 27 |
//! | Logging | LogEvent, LogReader | 28-29 |
//! | App | App(offset) | 0x8000+ |

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// First wire code reserved for application-defined kinds.
///
/// Consumer kinds are expressed as an offset above this base, so the
/// core catalog can keep growing below it without ever colliding.
pub const APP_KIND_BASE: u16 = 0x8000;

/// One member of the closed event catalog.
///
/// Ordinal stability matters only for wire/log compatibility, never for
/// logic: all routing in the host goes through the variant, not the
/// code. Use [`code`](Self::code) / [`from_code`](Self::from_code) at
/// the encoding boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Host event loop started; wired but no external I/O accepted yet.
    Started,
    /// Host is about to stop; observers may flush state.
    Stopping,
    /// Host stopped; the final occurrence a dispatcher ever delivers.
    Stopped,
    /// A peer connected to this host.
    PeerConnected,
    /// A peer disconnected from this host.
    PeerDisconnected,
    /// This host received data.
    Received,
    /// A malformed packet was received.
    ReceivedMalformed,
    /// An ACK for previously sent data was received.
    ReceivedAck,
    /// No host I/O for the configured quiet period.
    Idle,
    /// Periodic monitor tick.
    Timer,
    /// A hotkey was pressed on the attached terminal.
    Hotkey,
    /// User-defined hotkey follow-up.
    User,
    /// Asynchronous application event.
    Async,
    /// The terminal finished starting (commands may be defined now).
    TerminalStarted,
    /// A deferred-callback-queue entry completed (success or timeout).
    QueueCompleted,
    /// A stream connected.
    StreamConnected,
    /// A stream connection attempt timed out.
    StreamConnectTimeout,
    /// A stream disconnected.
    StreamDisconnected,
    /// An input stream has data.
    StreamData,
    /// A subscribe answer was received from a peer.
    SubscribeAck,
    /// A peer subscribed to an event at this host.
    Subscribed,
    /// A lightweight (L0) client connected through the proxy.
    L0Connected,
    /// A lightweight (L0) client disconnected.
    L0Disconnected,
    /// New-visit notification for a lightweight client.
    L0NewVisit,
    /// HTTP/WebSocket gateway event.
    Gateway,
    /// Data received over the Unix-socket bridge.
    BridgeReceived,
    /// The persistent key-value store was updated.
    StoreUpdated,
    /// External interval tick (e.g. an embedding UI's own timer).
    ExternalInterval,
    /// Logging server event.
    LogEvent,
    /// Log reader produced data.
    LogReader,
    /// Application-defined kind at `APP_KIND_BASE + offset`.
    App(u16),
}

/// Kind family, used for payload contracts and coarse filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventFamily {
    Lifecycle,
    Connection,
    Data,
    Health,
    Input,
    Terminal,
    Queue,
    Stream,
    PubSub,
    Proxy,
    Gateway,
    Bridge,
    Store,
    External,
    Logging,
    App,
}

impl EventKind {
    /// Returns the stable wire code of this kind.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Started => 0,
            Self::Stopping => 1,
            Self::Stopped => 2,
            Self::PeerConnected => 3,
            Self::PeerDisconnected => 4,
            Self::Received => 5,
            Self::ReceivedMalformed => 6,
            Self::ReceivedAck => 7,
            Self::Idle => 8,
            Self::Timer => 9,
            Self::Hotkey => 10,
            Self::User => 11,
            Self::Async => 12,
            Self::TerminalStarted => 13,
            Self::QueueCompleted => 14,
            Self::StreamConnected => 15,
            Self::StreamConnectTimeout => 16,
            Self::StreamDisconnected => 17,
            Self::StreamData => 18,
            Self::SubscribeAck => 19,
            Self::Subscribed => 20,
            Self::L0Connected => 21,
            Self::L0Disconnected => 22,
            Self::L0NewVisit => 23,
            Self::Gateway => 24,
            Self::BridgeReceived => 25,
            Self::StoreUpdated => 26,
            Self::ExternalInterval => 27,
            Self::LogEvent => 28,
            Self::LogReader => 29,
            Self::App(offset) => APP_KIND_BASE + offset,
        }
    }

    /// Decodes a wire code back into a kind.
    ///
    /// Codes at or above [`APP_KIND_BASE`] decode to [`App`](Self::App)
    /// with the offset preserved. Unassigned core codes are an error:
    /// they belong to catalog versions this build does not know.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownKind`] for unassigned core codes.
    pub fn from_code(code: u16) -> Result<Self, CatalogError> {
        if code >= APP_KIND_BASE {
            return Ok(Self::App(code - APP_KIND_BASE));
        }
        let kind = match code {
            0 => Self::Started,
            1 => Self::Stopping,
            2 => Self::Stopped,
            3 => Self::PeerConnected,
            4 => Self::PeerDisconnected,
            5 => Self::Received,
            6 => Self::ReceivedMalformed,
            7 => Self::ReceivedAck,
            8 => Self::Idle,
            9 => Self::Timer,
            10 => Self::Hotkey,
            11 => Self::User,
            12 => Self::Async,
            13 => Self::TerminalStarted,
            14 => Self::QueueCompleted,
            15 => Self::StreamConnected,
            16 => Self::StreamConnectTimeout,
            17 => Self::StreamDisconnected,
            18 => Self::StreamData,
            19 => Self::SubscribeAck,
            20 => Self::Subscribed,
            21 => Self::L0Connected,
            22 => Self::L0Disconnected,
            23 => Self::L0NewVisit,
            24 => Self::Gateway,
            25 => Self::BridgeReceived,
            26 => Self::StoreUpdated,
            27 => Self::ExternalInterval,
            28 => Self::LogEvent,
            29 => Self::LogReader,
            other => return Err(CatalogError::UnknownKind(other)),
        };
        Ok(kind)
    }

    /// Returns the family this kind belongs to.
    #[must_use]
    pub fn family(&self) -> EventFamily {
        match self {
            Self::Started | Self::Stopping | Self::Stopped => EventFamily::Lifecycle,
            Self::PeerConnected | Self::PeerDisconnected => EventFamily::Connection,
            Self::Received | Self::ReceivedMalformed | Self::ReceivedAck => EventFamily::Data,
            Self::Idle | Self::Timer => EventFamily::Health,
            Self::Hotkey | Self::User | Self::Async => EventFamily::Input,
            Self::TerminalStarted => EventFamily::Terminal,
            Self::QueueCompleted => EventFamily::Queue,
            Self::StreamConnected
            | Self::StreamConnectTimeout
            | Self::StreamDisconnected
            | Self::StreamData => EventFamily::Stream,
            Self::SubscribeAck | Self::Subscribed => EventFamily::PubSub,
            Self::L0Connected | Self::L0Disconnected | Self::L0NewVisit => EventFamily::Proxy,
            Self::Gateway => EventFamily::Gateway,
            Self::BridgeReceived => EventFamily::Bridge,
            Self::StoreUpdated => EventFamily::Store,
            Self::ExternalInterval => EventFamily::External,
            Self::LogEvent | Self::LogReader => EventFamily::Logging,
            Self::App(_) => EventFamily::App,
        }
    }

    /// Returns `true` for kinds that count as host I/O activity.
    ///
    /// These are the occurrences that refresh the idle clock: the idle
    /// monitor fires only after a quiet period with none of them.
    #[must_use]
    pub fn is_io_activity(&self) -> bool {
        matches!(
            self,
            Self::Received | Self::ReceivedMalformed | Self::ReceivedAck | Self::StreamData
        )
    }

    /// Returns `true` for the lifecycle bracket kinds.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self.family(), EventFamily::Lifecycle)
    }

    /// Returns `true` for application-defined kinds.
    #[must_use]
    pub fn is_app(&self) -> bool {
        matches!(self, Self::App(_))
    }

    /// Returns the display name of this kind.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::App(offset) => format!("App+{offset:#x}"),
            other => format!("{other:?}"),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
