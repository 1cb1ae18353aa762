//! Admin Module
//!
//! Prefix enumeration, aggregation, bulk delete and flush on top of the
//! store client traits.
//!
//! Every operation borrows the clients for one call and accepts a
//! [`CancellationToken`]; pass `CancellationToken::new()` when there is no
//! deadline. These operations are heavy (they walk the whole keyspace) and
//! are meant for maintenance, not request paths.
//!
//! # Absent vs empty
//! An `Err` from an enumerate, list or aggregate call means the enumeration
//! itself could not run. `Ok` with an empty collection means it ran and
//! nothing matched.

mod aggregate;
mod enumerate;
mod flush;
mod purge;

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::client::{ServerClient, ServerHandle, ValueClient};
use crate::error::{AdminError, Result};

pub use purge::PurgeReport;

/// Lazy, single-pass sequence of keys produced by one enumeration.
pub type KeyStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

// == Admin Settings ==
/// Tuning knobs for [`ServerUtil`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSettings {
    /// Work hint passed to each scan step
    pub scan_page_size: usize,
    /// Upper bound on a flush
    pub flush_timeout: Duration,
    /// Maximum deletes in flight during a bulk delete (1 = sequential)
    pub purge_concurrency: usize,
}

impl AdminSettings {
    /// Zero page size or concurrency is raised to 1.
    pub fn new(scan_page_size: usize, flush_timeout: Duration, purge_concurrency: usize) -> Self {
        Self {
            scan_page_size: scan_page_size.max(1),
            flush_timeout,
            purge_concurrency: purge_concurrency.max(1),
        }
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self::new(250, Duration::from_secs(30), 1)
    }
}

// == Server Util ==
/// Bulk and administrative operations over a key-value store.
#[derive(Clone)]
pub struct ServerUtil {
    server: Arc<dyn ServerClient>,
    values: Arc<dyn ValueClient>,
    settings: AdminSettings,
}

impl ServerUtil {
    pub fn new(
        server: Arc<dyn ServerClient>,
        values: Arc<dyn ValueClient>,
        settings: AdminSettings,
    ) -> Self {
        Self {
            server,
            values,
            settings,
        }
    }

    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }

    /// Obtains a server handle, giving up as soon as `cancel` fires.
    async fn connect(&self, cancel: &CancellationToken) -> Result<Arc<dyn ServerHandle>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdminError::Cancelled),
            handle = self.server.connect() => handle,
        }
    }
}

impl fmt::Debug for ServerUtil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerUtil")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
