//! In-Memory Store Module
//!
//! A store backend that implements both client traits, so the admin layer
//! can run without a networked server. Used by the HTTP server binary and
//! by the test suites.

mod entry;
mod glob;
mod keyspace;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::client::{ScanPage, ServerClient, ServerHandle, ValueClient};
use crate::config::Config;
use crate::error::{AdminError, Result};

pub use entry::{Entry, StoredValue};
pub use glob::glob_match;
pub use keyspace::Keyspace;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Memory Store ==
/// Shared handle to an in-memory keyspace.
///
/// Clones share the same data. Every operation takes the lock for the
/// duration of one command only.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    keyspace: Arc<RwLock<Keyspace>>,
    available: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store; `default_ttl` seconds apply to writes without a TTL.
    pub fn new(default_ttl: Option<u64>) -> Self {
        Self {
            keyspace: Arc::new(RwLock::new(Keyspace::new(default_ttl))),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl())
    }

    /// Simulates the store going down (`false`) or coming back (`true`).
    /// While down, every call fails with [`AdminError::Connection`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AdminError::Connection("store is unreachable".to_string()))
        }
    }

    // == Writes ==
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<u64>) -> Result<()> {
        self.ensure_available()?;
        self.keyspace.write().await.set(key.into(), value.into(), ttl)
    }

    pub async fn set_hash_field(
        &self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        ttl: Option<u64>,
    ) -> Result<()> {
        self.ensure_available()?;
        self.keyspace
            .write()
            .await
            .set_hash_field(key.into(), field.into(), value.into(), ttl)
    }

    // == Maintenance ==
    /// Removes expired entries. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        self.keyspace.write().await.purge_expired()
    }

    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl ServerClient for MemoryStore {
    async fn connect(&self) -> Result<Arc<dyn ServerHandle>> {
        self.ensure_available()?;
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl ServerHandle for MemoryStore {
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage> {
        self.ensure_available()
            .map_err(|e| AdminError::Scan(e.to_string()))?;
        // write lock: a step may open a new cursor
        let page = self.keyspace.write().await.scan(cursor, pattern, count)?;
        trace!(cursor, next = page.cursor, matched = page.keys.len(), "scan step");
        Ok(page)
    }

    async fn flush_all_databases(&self) -> Result<()> {
        self.ensure_available()?;
        let removed = self.keyspace.write().await.clear();
        trace!(removed, "keyspace cleared");
        Ok(())
    }
}

#[async_trait]
impl ValueClient for MemoryStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        // write lock: reads may evict an expired key
        self.keyspace.write().await.get(key)
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        self.keyspace.write().await.get_hash_field(key, field)
    }

    async fn delete(&self, key: &str, fire_and_forget: bool) -> Result<bool> {
        self.ensure_available()?;
        let existed = self.keyspace.write().await.delete(key);
        Ok(existed && !fire_and_forget)
    }
}
