//! Key enumeration: drives the store's cursor scan to completion.

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{KeyStream, ServerUtil};
use crate::client::ServerHandle;
use crate::error::{AdminError, Result};
use crate::keys::{build_prefix, search_pattern};

impl ServerUtil {
    // == Enumerate ==
    /// Returns a lazy stream of every key starting with `prefix`.
    ///
    /// A trailing `*` on `prefix` is tolerated and never doubled. Failing
    /// to connect is reported here; a scan that breaks later ends the
    /// stream with an error item. Keys already yielded stand.
    pub async fn enumerate_keys(&self, prefix: &str, cancel: &CancellationToken) -> Result<KeyStream> {
        let pattern = search_pattern(prefix);
        let handle = self.connect(cancel).await?;

        debug!(%pattern, page_size = self.settings.scan_page_size, "Enumerating keys");
        Ok(Box::pin(scan_to_completion(
            handle,
            pattern,
            self.settings.scan_page_size,
            cancel.clone(),
        )))
    }

    pub async fn enumerate_keys_in(
        &self,
        namespace: &str,
        sub_prefix: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<KeyStream> {
        self.enumerate_keys(&build_prefix(namespace, sub_prefix), cancel)
            .await
    }

    // == List ==
    /// Drains [`enumerate_keys`](Self::enumerate_keys) into a list.
    pub async fn list_keys(&self, prefix: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        let mut stream = self.enumerate_keys(prefix, cancel).await?;

        let mut keys = Vec::with_capacity(64);
        while let Some(key) = stream.next().await {
            keys.push(key?);
        }
        Ok(keys)
    }

    pub async fn list_keys_in(
        &self,
        namespace: &str,
        sub_prefix: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        self.list_keys(&build_prefix(namespace, sub_prefix), cancel)
            .await
    }
}

/// Walks the scan cursor from 0 until the store hands back 0, yielding keys
/// page by page. Each step races the cancellation token.
fn scan_to_completion(
    handle: Arc<dyn ServerHandle>,
    pattern: String,
    page_size: usize,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        let mut cursor = 0u64;
        loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(AdminError::Cancelled),
                page = handle.scan(cursor, &pattern, page_size) => page,
            };
            let page = step?;

            for key in page.keys {
                yield key;
            }

            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }
    }
}
