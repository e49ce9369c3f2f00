//! Unified error interface.
//!
//! All knot error types implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: for programmatic error handling
//! - **Recoverability info**: for retry logic and caller feedback
//!
//! # Code Format
//!
//! Error codes are UPPER_SNAKE_CASE, prefixed with their layer
//! (`EVENT_`, `HOST_`), and stable once defined — a changed code is a
//! breaking change for any consumer matching on it.
//!
//! # Example
//!
//! ```
//! use knot_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound,
//!     Timeout,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound => "MY_NOT_FOUND",
//!             Self::Timeout => "MY_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert!(MyError::Timeout.is_recoverable());
//! ```

/// Unified error code interface for knot errors.
///
/// # Recoverability
///
/// An error is recoverable if retrying the operation may succeed (a
/// transient condition). Invalid input and programming errors are not
/// recoverable: retrying without a code change cannot help.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// UPPER_SNAKE_CASE, layer-prefixed, stable across versions.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows knot conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected layer prefix.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for
/// use in tests.
pub fn assert_error_code<E: ErrorCode + std::fmt::Debug>(err: &E, prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "error code is empty for {err:?}");
    assert!(
        code.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit()),
        "error code {code:?} is not UPPER_SNAKE_CASE (from {err:?})"
    );
    assert!(
        code.starts_with(prefix),
        "error code {code:?} does not start with {prefix:?} (from {err:?})"
    );
}

/// Validates every variant in `errors` with [`assert_error_code`].
///
/// Use with a `fn all_variants() -> Vec<..>` helper so new variants
/// cannot skip the convention check.
pub fn assert_error_codes<E: ErrorCode + std::fmt::Debug>(errors: &[E], prefix: &str) {
    assert!(!errors.is_empty(), "no error variants supplied");
    for err in errors {
        assert_error_code(err, prefix);
    }
}
