//! Identifier types for the knot host.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle returned by observer registration.
///
/// Used to unregister an observer later. Each registration gets a fresh
/// random id, so re-registering the same callback yields a distinct
/// handle.
///
/// # Example
///
/// ```
/// use knot_types::ObserverId;
///
/// let a = ObserverId::new();
/// let b = ObserverId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Creates a new random observer id.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough for logs; the full uuid adds no routing value.
        let s = self.0.simple().to_string();
        write!(f, "obs-{}", &s[..8])
    }
}

/// Caller-supplied key identifying one pending deferred wait.
///
/// Producers pick the key from their own domain: a packet id
/// (`"pkt-7"`), a peer name (`"relay-2"`), or anything else unique among
/// the waits they have in flight. At most one pending entry may exist
/// per key at a time.
///
/// # Example
///
/// ```
/// use knot_types::QueueKey;
///
/// let key = QueueKey::from("pkt-7");
/// assert_eq!(key.as_str(), "pkt-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueKey(String);

impl QueueKey {
    /// Creates a key from anything string-like.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueueKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QueueKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for QueueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_ids_are_unique() {
        let a = ObserverId::new();
        let b = ObserverId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn observer_id_display_is_short() {
        let id = ObserverId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("obs-"));
        assert_eq!(shown.len(), "obs-".len() + 8);
    }

    #[test]
    fn queue_key_round_trips() {
        let key = QueueKey::from("pkt-7");
        assert_eq!(key.as_str(), "pkt-7");
        assert_eq!(key.to_string(), "pkt-7");
        assert_eq!(key, QueueKey::new(String::from("pkt-7")));
    }

    #[test]
    fn queue_key_serde() {
        let key = QueueKey::from("peer-a");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""peer-a""#);
        let back: QueueKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
