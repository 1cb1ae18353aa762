//! Server flush.

use tokio_util::sync::CancellationToken;

use super::ServerUtil;
use crate::error::{AdminError, Result};
use crate::events;

impl ServerUtil {
    // == Flush All ==
    /// Erases every key on the server with a single command.
    ///
    /// Bounded by `cancel` and the configured flush timeout. Failures are
    /// logged as `FLUSH_ERROR` events and never returned; callers that need
    /// confirmation must watch the events.
    pub async fn flush_all(&self, cancel: &CancellationToken) {
        events::flushing();

        match self.try_flush_all(cancel).await {
            Ok(()) => events::flushed_ok(),
            Err(e) => events::flush_error(&e),
        }
    }

    async fn try_flush_all(&self, cancel: &CancellationToken) -> Result<()> {
        let timeout = self.settings.flush_timeout;
        let flush = async {
            let handle = self.connect(cancel).await?;
            handle.flush_all_databases().await
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdminError::Cancelled),
            outcome = tokio::time::timeout(timeout, flush) => {
                outcome.map_err(|_| AdminError::Timeout(timeout))?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminSettings;
    use crate::memory::MemoryStore;
    use std::sync::Arc;

    fn util_for(store: &MemoryStore) -> ServerUtil {
        ServerUtil::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            AdminSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_flush_empties_store() {
        let store = MemoryStore::default();
        store.set("a:1", "v", None).await.unwrap();
        store.set("b:1", "v", None).await.unwrap();
        let util = util_for(&store);

        util.flush_all(&CancellationToken::new()).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_flush_failure_is_swallowed() {
        let store = MemoryStore::default();
        store.set("a:1", "v", None).await.unwrap();
        store.set_available(false);
        let util = util_for(&store);

        util.flush_all(&CancellationToken::new()).await;
        assert!(matches!(
            util.try_flush_all(&CancellationToken::new()).await,
            Err(AdminError::Connection(_))
        ));

        store.set_available(true);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_flush_cancelled() {
        let store = MemoryStore::default();
        store.set("a:1", "v", None).await.unwrap();
        let util = util_for(&store);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(
            util.try_flush_all(&cancel).await,
            Err(AdminError::Cancelled)
        ));
        util.flush_all(&cancel).await;
        assert_eq!(store.len().await, 1);
    }
}
