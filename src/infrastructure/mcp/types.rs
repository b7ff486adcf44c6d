//! MCP HTTP server types.
//!
//! JSON-RPC 2.0 envelope plus the stable error-code mapping for the
//! gateway error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::GatewayError;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Stable error codes so callers can tell "no such Pokemon" from
/// "service degraded, try again".
pub mod error_codes {
    /// JSON-RPC: method not found.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// JSON-RPC: invalid params (also used for unknown tool names).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Identifier does not exist upstream.
    pub const NOT_FOUND: i32 = -32001;
    /// Upstream unreachable after retries; retryable by the caller.
    pub const UPSTREAM_UNAVAILABLE: i32 = -32002;
    /// Upstream broke its contract; not retryable.
    pub const UPSTREAM_MALFORMED: i32 = -32003;
    /// Cache store unreachable in a path that could not degrade.
    pub const CACHE_UNAVAILABLE: i32 = -32004;
}

impl From<&GatewayError> for JsonRpcError {
    fn from(err: &GatewayError) -> Self {
        let code = match err {
            GatewayError::InvalidArguments(_) => error_codes::INVALID_PARAMS,
            GatewayError::NotFound { .. } => error_codes::NOT_FOUND,
            GatewayError::UpstreamUnavailable(_) => error_codes::UPSTREAM_UNAVAILABLE,
            GatewayError::UpstreamMalformed(_) => error_codes::UPSTREAM_MALFORMED,
            GatewayError::CacheUnavailable(_) => error_codes::CACHE_UNAVAILABLE,
        };
        Self::new(code, err.to_string())
    }
}

impl IntoResponse for JsonRpcResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EntityKind;

    #[test]
    fn test_error_kinds_map_to_distinct_codes() {
        let errors = [
            GatewayError::InvalidArguments("x".into()),
            GatewayError::NotFound {
                kind: EntityKind::Pokemon,
                identifier: "x".into(),
            },
            GatewayError::UpstreamUnavailable("x".into()),
            GatewayError::UpstreamMalformed("x".into()),
            GatewayError::CacheUnavailable("x".into()),
        ];
        let codes: std::collections::HashSet<_> =
            errors.iter().map(|e| JsonRpcError::from(e).code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_success_omits_error_field() {
        let response = JsonRpcResponse::success(None, serde_json::json!({"ok": true}));
        let raw = serde_json::to_string(&response).unwrap();
        assert!(!raw.contains("\"error\""));
    }
}
