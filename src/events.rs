//! Structured Events
//!
//! Fixed event identifiers for everything the admin layer reports through
//! logs. Bulk deletes and flushes never surface per-key or flush failures
//! as errors, so these events are the only record of them.

use std::fmt::Display;

use tracing::{debug, error, warn};

// == Event Ids ==
pub const REMOVING_KEYS: u32 = 1001;
pub const REMOVE_ERROR: u32 = 1002;
pub const FLUSHING: u32 = 1003;
pub const FLUSHED_OK: u32 = 1004;
pub const FLUSH_ERROR: u32 = 1005;

/// A bulk delete is about to remove every key matching `pattern`.
pub fn removing_keys(pattern: &str, count: usize) {
    warn!(
        event_id = REMOVING_KEYS,
        event = "removing_keys",
        pattern,
        count,
        "Removing keys matching pattern"
    );
}

/// Deleting `key` failed during a bulk delete of `pattern`.
pub fn remove_error(pattern: &str, key: &str, err: &dyn Display) {
    error!(
        event_id = REMOVE_ERROR,
        event = "remove_error",
        pattern,
        key,
        error = %err,
        "Error removing key matching pattern"
    );
}

pub fn flushing() {
    warn!(event_id = FLUSHING, event = "flushing", "Flushing all databases");
}

pub fn flushed_ok() {
    debug!(event_id = FLUSHED_OK, event = "flushed_ok", "Flushed successfully");
}

pub fn flush_error(err: &dyn Display) {
    error!(
        event_id = FLUSH_ERROR,
        event = "flush_error",
        error = %err,
        "Error flushing server"
    );
}
