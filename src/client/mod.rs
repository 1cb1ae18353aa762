//! Store Client Traits
//!
//! The admin layer never talks to a store directly. It borrows a server
//! handle for scans and flushes and a value client for point operations;
//! both are supplied by the caller at construction time.
//!
//! Implementations must be safe for concurrent use. Bulk deletes may fan
//! out several point operations over one client at the same time.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

// == Scan Page ==
/// One page of a cursor-based scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor to resume from; 0 once the scan is complete
    pub cursor: u64,
    /// Keys matched on this page
    pub keys: Vec<String>,
}

impl ScanPage {
    pub fn new(cursor: u64, keys: Vec<String>) -> Self {
        Self { cursor, keys }
    }

    /// Returns true if this is the last page of the scan.
    pub fn is_last(&self) -> bool {
        self.cursor == 0
    }
}

// == Server Handle ==
/// Server-level operations on a connected store.
#[async_trait]
pub trait ServerHandle: Send + Sync {
    /// Runs one step of the store's cursor scan.
    ///
    /// Start with cursor 0 and keep passing back the returned cursor until
    /// it comes back as 0. `count` is a hint for how much work one step
    /// may do, not a limit on the number of keys returned.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage>;

    /// Erases every key in every database of the server.
    async fn flush_all_databases(&self) -> Result<()>;
}

// == Server Client ==
/// Hands out server handles. Connection lifecycle belongs to the client.
#[async_trait]
pub trait ServerClient: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ServerHandle>>;
}

// == Value Client ==
/// Point operations on individual keys.
#[async_trait]
pub trait ValueClient: Send + Sync {
    /// Reads a string value. `Ok(None)` if the key is missing or expired.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Reads one field of a hash. `Ok(None)` if the key or field is missing.
    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Deletes a key.
    ///
    /// With `fire_and_forget` the command is dispatched without waiting for
    /// the store's acknowledgement and always reports `false`. Otherwise
    /// returns whether the key existed.
    async fn delete(&self, key: &str, fire_and_forget: bool) -> Result<bool>;
}

// == Typed Access ==
/// Deserializing reads on top of [`ValueClient`].
///
/// Values are stored as JSON. A payload that does not decode into `T` is
/// reported as "no value" rather than as an error.
#[async_trait]
pub trait ValueClientExt: ValueClient {
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.get_string(key).await?;
        Ok(raw.and_then(|payload| decode(key, &payload)))
    }

    async fn get_hash<T>(&self, key: &str, field: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.get_hash_field(key, field).await?;
        Ok(raw.and_then(|payload| decode(key, &payload)))
    }
}

impl<C: ValueClient + ?Sized> ValueClientExt for C {}

fn decode<T: DeserializeOwned>(key: &str, payload: &str) -> Option<T> {
    match serde_json::from_str(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(key, error = %e, "Value did not deserialize, treating as missing");
            None
        }
    }
}
