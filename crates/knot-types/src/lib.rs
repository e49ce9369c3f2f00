//! Core types for the knot host.
//!
//! This crate is the bottom of the workspace: identifier types shared by
//! the event catalog and the host runtime, plus the [`ErrorCode`] trait
//! that every knot error implements.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  knot-host   : Dispatcher, CQue, Host      │
//! ├────────────────────────────────────────────┤
//! │  knot-event  : EventKind, Event, payloads  │
//! ├────────────────────────────────────────────┤
//! │  knot-types  : ObserverId, QueueKey,       │
//! │                ErrorCode       ◄── HERE    │
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Main Types
//!
//! - [`ObserverId`] - handle returned by observer registration
//! - [`QueueKey`] - caller-supplied key for deferred-callback waits
//! - [`ErrorCode`] - machine-readable error codes + recoverability

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ObserverId, QueueKey};
