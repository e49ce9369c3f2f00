//! Host layer errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`HostError::DuplicateKey`] | `HOST_DUPLICATE_KEY` | No |
//! | [`HostError::Stopped`] | `HOST_STOPPED` | No |
//! | [`HostError::NotRunning`] | `HOST_NOT_RUNNING` | No |
//! | [`HostError::InvalidTransition`] | `HOST_INVALID_TRANSITION` | No |
//!
//! None of these is fatal to the process: the caller decides what an
//! individual failure means. [`HostError::Stopped`] in particular is a
//! deliberate programming-error report — a dispatch or registration
//! raced host shutdown, and silently dropping it would hide the race.

use crate::host::HostState;
use knot_types::{ErrorCode, QueueKey};
use thiserror::Error;

/// Host layer error.
///
/// # Example
///
/// ```
/// use knot_host::HostError;
/// use knot_types::{ErrorCode, QueueKey};
///
/// let err = HostError::DuplicateKey(QueueKey::from("pkt-7"));
/// assert_eq!(err.code(), "HOST_DUPLICATE_KEY");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// A deferred-wait key already has a pending entry.
    ///
    /// The existing entry is untouched; the caller decides whether to
    /// resolve it first or pick a different key.
    #[error("deferred wait already pending for key: {0}")]
    DuplicateKey(QueueKey),

    /// Dispatch or registration attempted after the host stopped.
    #[error("host is stopped; no further dispatch or registration")]
    Stopped,

    /// An operation that needs a running host was called while the host
    /// was not running.
    #[error("host is not running")]
    NotRunning,

    /// A lifecycle transition the state machine does not allow.
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        /// State the host was in.
        from: HostState,
        /// State the caller asked for.
        to: HostState,
    },
}

impl ErrorCode for HostError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateKey(_) => "HOST_DUPLICATE_KEY",
            Self::Stopped => "HOST_STOPPED",
            Self::NotRunning => "HOST_NOT_RUNNING",
            Self::InvalidTransition { .. } => "HOST_INVALID_TRANSITION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Failure reported by an observer callback during a fan-out pass.
///
/// Caught at the dispatcher boundary: the failure is logged, recorded in
/// the pass report, and delivery continues to the remaining observers.
/// Never re-dispatched as an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("observer failed: {0}")]
pub struct ObserverError(pub String);

impl From<&str> for ObserverError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

impl From<String> for ObserverError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}
