//! Aggregation: fetch the value behind every enumerated key into a map.

use std::collections::HashMap;
use std::future::Future;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ServerUtil;
use crate::client::{ValueClient, ValueClientExt};
use crate::error::{AdminError, Result};
use crate::keys::build_prefix;

impl ServerUtil {
    // == Typed Values ==
    /// Maps every key under `prefix` to its deserialized value.
    ///
    /// Keys whose value is gone or does not deserialize into `T` are left
    /// out. Enumeration and fetch are not atomic, so that is expected.
    pub async fn aggregate_values<T>(
        &self,
        prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, T>>
    where
        T: DeserializeOwned + Send,
    {
        let keys = self.list_keys(prefix, cancel).await?;
        let values: &dyn ValueClient = self.values.as_ref();

        let map = collect_by_key(keys, cancel, move |key| async move { values.get::<T>(&key).await })
            .await?;
        debug!(prefix, collected = map.len(), "Aggregated values");
        Ok(map)
    }

    pub async fn aggregate_values_in<T>(
        &self,
        namespace: &str,
        sub_prefix: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, T>>
    where
        T: DeserializeOwned + Send,
    {
        self.aggregate_values(&build_prefix(namespace, sub_prefix), cancel)
            .await
    }

    // == Raw Strings ==
    /// Maps every key under `prefix` to its stored string, undecoded.
    pub async fn aggregate_raw_strings(
        &self,
        prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, String>> {
        let keys = self.list_keys(prefix, cancel).await?;
        let values: &dyn ValueClient = self.values.as_ref();

        collect_by_key(keys, cancel, move |key| async move { values.get_string(&key).await }).await
    }

    pub async fn aggregate_raw_strings_in(
        &self,
        namespace: &str,
        sub_prefix: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, String>> {
        self.aggregate_raw_strings(&build_prefix(namespace, sub_prefix), cancel)
            .await
    }

    // == Hash Field ==
    /// Maps every hash under `prefix` to its deserialized `field`.
    ///
    /// Keys without the field, or whose field does not deserialize, are
    /// left out.
    pub async fn aggregate_hash_field<T>(
        &self,
        prefix: &str,
        field: &str,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, T>>
    where
        T: DeserializeOwned + Send,
    {
        let keys = self.list_keys(prefix, cancel).await?;
        let values: &dyn ValueClient = self.values.as_ref();

        collect_by_key(keys, cancel, move |key| async move {
            values.get_hash::<T>(&key, field).await
        })
        .await
    }
}

/// Fetches keys one at a time in enumeration order, keeping the ones that
/// produced a value.
///
/// A command error on one key (wrong type, rejected read) only drops that
/// key. Connection, scan and cancellation errors abort the aggregate.
async fn collect_by_key<T, F, Fut>(
    keys: Vec<String>,
    cancel: &CancellationToken,
    mut fetch: F,
) -> Result<HashMap<String, T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut map = HashMap::with_capacity(keys.len());

    for key in keys {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AdminError::Cancelled),
            fetched = fetch(key.clone()) => fetched,
        };

        match fetched {
            Ok(Some(value)) => {
                map.insert(key, value);
            }
            Ok(None) => {}
            Err(AdminError::Command { message, .. }) => {
                debug!(%key, %message, "Skipping key that could not be read");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(map)
}
