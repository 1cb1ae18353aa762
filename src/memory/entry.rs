//! Stored Entry Module
//!
//! Values held by the in-memory store, with optional expiry.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// The two value shapes the admin layer reads: plain strings and hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    Hash(HashMap<String, String>),
}

impl StoredValue {
    /// Name reported in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Text(_) => "string",
            StoredValue::Hash(_) => "hash",
        }
    }
}

// == Entry ==
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl Entry {
    /// Creates an entry that expires `ttl_seconds` from now, if given.
    pub fn new(value: StoredValue, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            expires_at: expiry_after(ttl_seconds),
        }
    }

    /// An entry is expired once the current time reaches its expiry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(expires) if now_ms >= expires)
    }

    /// Remaining TTL in milliseconds; `Some(0)` once expired.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

/// Expiry timestamp `ttl_seconds` from now, or None without a TTL.
///
/// Saturates at `u64::MAX`, which never expires in practice.
pub fn expiry_after(ttl_seconds: Option<u64>) -> Option<u64> {
    ttl_seconds.map(|ttl| current_timestamp_ms().saturating_add(ttl.saturating_mul(1000)))
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = Entry::new(StoredValue::Text("v".into()), None);
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = Entry::new(StoredValue::Text("v".into()), Some(10));
        let remaining = entry.ttl_remaining_ms().unwrap();
        assert!(!entry.is_expired());
        assert!(remaining <= 10_000 && remaining >= 9_000);
    }

    #[test]
    fn test_expiration_boundary() {
        let now = current_timestamp_ms();
        let entry = Entry {
            value: StoredValue::Text("v".into()),
            expires_at: Some(now),
        };
        assert!(entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now - 1));
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        assert_eq!(expiry_after(Some(u64::MAX / 100)), Some(u64::MAX));

        let entry = Entry::new(StoredValue::Text("v".into()), Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_value_type_name() {
        let hash = StoredValue::Hash(HashMap::new());

        assert_eq!(hash.type_name(), "hash");
        assert_eq!(StoredValue::Text("abc".into()).type_name(), "string");
    }
}
