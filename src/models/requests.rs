//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::keys::build_prefix;
use crate::memory::MAX_KEY_LENGTH;

/// Request body for PUT /set
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for PUT /hset
#[derive(Debug, Clone, Deserialize)]
pub struct HashSetRequest {
    pub key: String,
    pub field: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl HashSetRequest {
    pub fn validate(&self) -> Option<String> {
        if self.field.is_empty() {
            return Some("Field cannot be empty".to_string());
        }
        validate_key(&self.key)
    }
}

/// Query string selecting a key prefix: `?namespace=orders&prefix=eu`
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixQuery {
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl PrefixQuery {
    pub fn validate(&self) -> Option<String> {
        validate_namespace(&self.namespace)
    }

    pub fn sub_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

/// Query string for GET /hashes
#[derive(Debug, Clone, Deserialize)]
pub struct HashFieldQuery {
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
    pub field: String,
}

impl HashFieldQuery {
    pub fn validate(&self) -> Option<String> {
        if self.field.is_empty() {
            return Some("Field cannot be empty".to_string());
        }
        validate_namespace(&self.namespace)
    }
}

/// Query string for DELETE /keys
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub fire_and_forget: bool,
}

impl DeleteQuery {
    pub fn validate(&self) -> Option<String> {
        validate_namespace(&self.namespace)
    }
}

/// An empty namespace would select the whole keyspace, which only
/// `POST /flush` is allowed to do.
fn validate_namespace(namespace: &str) -> Option<String> {
    if build_prefix(namespace, None).is_empty() {
        return Some("Namespace cannot be empty".to_string());
    }
    None
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}
