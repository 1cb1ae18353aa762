//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::admin::{PurgeReport, ServerUtil};
use crate::client::ValueClient;
use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::keys::{build_prefix, search_pattern};
use crate::memory::MemoryStore;
use crate::models::{
    DeleteQuery, FlushResponse, GetResponse, HashFieldQuery, HashSetRequest, HealthResponse,
    KeysResponse, PrefixQuery, SetRequest, SetResponse, ValuesResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bulk operations over `store`
    pub admin: Arc<ServerUtil>,
    /// Backing store, also used for point reads and writes
    pub store: MemoryStore,
    /// Cancelled on server shutdown; every admin call runs under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new AppState over `store`.
    pub fn new(store: MemoryStore, config: &Config) -> Self {
        let admin = ServerUtil::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            config.admin_settings(),
        );
        Self {
            admin: Arc::new(admin),
            store,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a new AppState with a fresh store built from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(MemoryStore::from_config(config), config)
    }

    fn cancel_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    state.store.set(req.key.clone(), req.value, req.ttl).await?;
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for PUT /hset
pub async fn hset_handler(
    State(state): State<AppState>,
    Json(req): Json<HashSetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    state
        .store
        .set_hash_field(req.key.clone(), req.field, req.value, req.ttl)
        .await?;
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.store.get_string(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(AdminError::NotFound(key)),
    }
}

/// Handler for GET /keys
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<KeysResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    let keys = state
        .admin
        .list_keys_in(&query.namespace, query.sub_prefix(), &state.cancel_token())
        .await?;
    Ok(Json(KeysResponse::new(pattern_for(&query), keys)))
}

/// Handler for GET /values
///
/// Values are returned as stored, without decoding.
pub async fn values_handler(
    State(state): State<AppState>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<ValuesResponse<String>>> {
    if let Some(error_msg) = query.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    let values = state
        .admin
        .aggregate_raw_strings_in(&query.namespace, query.sub_prefix(), &state.cancel_token())
        .await?;
    Ok(Json(ValuesResponse::new(pattern_for(&query), values)))
}

/// Handler for GET /values/json
///
/// Keys whose value is not valid JSON are left out.
pub async fn json_values_handler(
    State(state): State<AppState>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<ValuesResponse<serde_json::Value>>> {
    if let Some(error_msg) = query.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    let values = state
        .admin
        .aggregate_values_in::<serde_json::Value>(
            &query.namespace,
            query.sub_prefix(),
            &state.cancel_token(),
        )
        .await?;
    Ok(Json(ValuesResponse::new(pattern_for(&query), values)))
}

/// Handler for GET /hashes
pub async fn hashes_handler(
    State(state): State<AppState>,
    Query(query): Query<HashFieldQuery>,
) -> Result<Json<ValuesResponse<serde_json::Value>>> {
    if let Some(error_msg) = query.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    let prefix = build_prefix(&query.namespace, query.prefix.as_deref());
    let values = state
        .admin
        .aggregate_hash_field::<serde_json::Value>(&prefix, &query.field, &state.cancel_token())
        .await?;
    Ok(Json(ValuesResponse::new(search_pattern(&prefix), values)))
}

/// Handler for DELETE /keys
pub async fn delete_keys_handler(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<PurgeReport>> {
    if let Some(error_msg) = query.validate() {
        return Err(AdminError::InvalidRequest(error_msg));
    }

    let report = state
        .admin
        .delete_by_prefix_in(
            &query.namespace,
            query.prefix.as_deref(),
            query.fire_and_forget,
            &state.cancel_token(),
        )
        .await?;
    Ok(Json(report))
}

/// Handler for POST /flush
///
/// Always answers 202; a failed flush is only visible in the logs.
pub async fn flush_handler(State(state): State<AppState>) -> (StatusCode, Json<FlushResponse>) {
    let response = FlushResponse::issued();
    state.admin.flush_all(&state.cancel_token()).await;
    (StatusCode::ACCEPTED, Json(response))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn pattern_for(query: &PrefixQuery) -> String {
    search_pattern(&build_prefix(&query.namespace, query.sub_prefix()))
}
