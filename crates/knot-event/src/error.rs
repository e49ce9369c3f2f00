//! Catalog errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`CatalogError::UnknownKind`] | `EVENT_UNKNOWN_KIND` | No |
//! | [`CatalogError::PayloadMismatch`] | `EVENT_PAYLOAD_MISMATCH` | No |

use crate::catalog::EventKind;
use knot_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event catalog error.
///
/// # Example
///
/// ```
/// use knot_event::CatalogError;
/// use knot_types::ErrorCode;
///
/// let err = CatalogError::UnknownKind(42);
/// assert_eq!(err.code(), "EVENT_UNKNOWN_KIND");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CatalogError {
    /// A core wire code this build's catalog does not assign.
    ///
    /// Either the sender speaks a newer catalog version or the code is
    /// corrupt. Retrying cannot help.
    #[error("unknown event kind code: {0}")]
    UnknownKind(u16),

    /// An envelope whose payload variant does not match its kind's
    /// documented contract.
    #[error("payload does not match contract for kind {kind}")]
    PayloadMismatch {
        /// The kind whose contract was violated.
        kind: EventKind,
    },
}

impl ErrorCode for CatalogError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "EVENT_UNKNOWN_KIND",
            Self::PayloadMismatch { .. } => "EVENT_PAYLOAD_MISMATCH",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knot_types::assert_error_codes;

    fn all_variants() -> Vec<CatalogError> {
        vec![
            CatalogError::UnknownKind(42),
            CatalogError::PayloadMismatch {
                kind: EventKind::Timer,
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EVENT_");
    }

    #[test]
    fn messages_name_the_offender() {
        assert!(CatalogError::UnknownKind(42).to_string().contains("42"));
        let err = CatalogError::PayloadMismatch {
            kind: EventKind::Timer,
        };
        assert!(err.to_string().contains("Timer"));
    }
}
