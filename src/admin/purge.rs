//! Bulk delete by prefix with per-key fault isolation.

use futures::{future, stream, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::ServerUtil;
use crate::client::ValueClient;
use crate::error::{AdminError, Result};
use crate::events;
use crate::keys::{build_prefix, search_pattern};

// == Purge Report ==
/// Counts from one bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Pattern the keys were enumerated with
    pub pattern: String,
    /// Keys found by the enumeration
    pub matched: usize,
    /// Delete commands that succeeded
    pub deleted: usize,
    /// Delete commands that failed and were logged
    pub failed: usize,
}

impl ServerUtil {
    // == Delete By Prefix ==
    /// Deletes every key under `prefix`.
    ///
    /// The key list is materialized first; if enumeration fails nothing is
    /// deleted and the error is returned. Each key is then deleted on its
    /// own: a failure is logged with the key and the next key is still
    /// attempted. Cancellation stops new deletes but keeps those already
    /// sent.
    pub async fn delete_by_prefix(
        &self,
        prefix: &str,
        fire_and_forget: bool,
        cancel: &CancellationToken,
    ) -> Result<PurgeReport> {
        let pattern = search_pattern(prefix);
        let keys = self.list_keys(prefix, cancel).await?;

        let mut report = PurgeReport {
            pattern,
            matched: keys.len(),
            ..PurgeReport::default()
        };
        if keys.is_empty() {
            return Ok(report);
        }

        events::removing_keys(&report.pattern, keys.len());

        let values: &dyn ValueClient = self.values.as_ref();
        let pattern = report.pattern.as_str();
        let outcomes: Vec<bool> = stream::iter(keys)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(move |key| async move {
                match values.delete(&key, fire_and_forget).await {
                    Ok(_) => true,
                    Err(e) => {
                        events::remove_error(pattern, &key, &e);
                        false
                    }
                }
            })
            .buffer_unordered(self.settings.purge_concurrency)
            .collect()
            .await;

        report.deleted = outcomes.iter().filter(|deleted| **deleted).count();
        report.failed = outcomes.len() - report.deleted;

        if outcomes.len() < report.matched {
            info!(
                pattern = %report.pattern,
                attempted = outcomes.len(),
                matched = report.matched,
                "Bulk delete cancelled"
            );
            return Err(AdminError::Cancelled);
        }

        Ok(report)
    }

    pub async fn delete_by_prefix_in(
        &self,
        namespace: &str,
        sub_prefix: Option<&str>,
        fire_and_forget: bool,
        cancel: &CancellationToken,
    ) -> Result<PurgeReport> {
        self.delete_by_prefix(&build_prefix(namespace, sub_prefix), fire_and_forget, cancel)
            .await
    }
}
