//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for PUT /set and PUT /hset
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Pattern the keys were enumerated with
    pub pattern: String,
    pub count: usize,
    pub keys: Vec<String>,
}

impl KeysResponse {
    pub fn new(pattern: impl Into<String>, mut keys: Vec<String>) -> Self {
        keys.sort_unstable();
        Self {
            pattern: pattern.into(),
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for the aggregate endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ValuesResponse<T: Serialize> {
    pub pattern: String,
    pub count: usize,
    pub values: HashMap<String, T>,
}

impl<T: Serialize> ValuesResponse<T> {
    pub fn new(pattern: impl Into<String>, values: HashMap<String, T>) -> Self {
        Self {
            pattern: pattern.into(),
            count: values.len(),
            values,
        }
    }
}

/// Response body for POST /flush
///
/// A flush never reports failure to the caller; the outcome is in the
/// server logs.
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub message: String,
    /// When the flush was issued, ISO 8601
    pub requested_at: String,
}

impl FlushResponse {
    pub fn issued() -> Self {
        Self {
            message: "Flush issued".to_string(),
            requested_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_response_sorted_with_count() {
        let resp = KeysResponse::new("a:*", vec!["a:2".into(), "a:1".into()]);
        assert_eq!(resp.count, 2);
        assert_eq!(resp.keys, vec!["a:1".to_string(), "a:2".to_string()]);
    }

    #[test]
    fn test_values_response_serialize() {
        let mut values = HashMap::new();
        values.insert("cfg:a".to_string(), "1".to_string());

        let json = serde_json::to_value(ValuesResponse::new("cfg:*", values)).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["values"]["cfg:a"], "1");
    }

    #[test]
    fn test_set_response_serialize() {
        let json = serde_json::to_string(&SetResponse::new("my_key")).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_flush_response_has_timestamp() {
        let resp = FlushResponse::issued();
        assert!(chrono::DateTime::parse_from_rfc3339(&resp.requested_at).is_ok());
    }
}
