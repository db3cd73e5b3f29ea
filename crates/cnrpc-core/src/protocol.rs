//! JSON-RPC 2.0 envelopes for the daemon's `/json_rpc` endpoint.

use serde_json::Value;

use crate::error::{CoreError, RpcError};

pub const JSON_RPC_PATH: &str = "/json_rpc";

#[derive(Debug, serde::Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) id: u64,
    pub(crate) method: &'a str,
    pub(crate) params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub(crate) fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        serde_json::json!({
            "jsonrpc": self.jsonrpc,
            "id": self.id,
            "method": self.method,
            "params": self.params,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub(crate) result: Option<Value>,
    #[serde(default)]
    pub(crate) error: Option<Value>,
}

/// Unwrap a JSON-RPC response body into its `result`.
///
/// An `error` member wins over `result`; a body that is neither is rejected
/// rather than read as `null`.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value, CoreError> {
    let decoded: JsonRpcResponse = serde_json::from_value(body).map_err(|e| {
        RpcError::InvalidResponse(format!("decode JSON-RPC response: {e}"))
    })?;

    if let Some(err) = decoded.error.filter(|err| !err.is_null()) {
        return Err(parse_jsonrpc_error(err));
    }

    decoded.result.ok_or_else(|| {
        RpcError::InvalidResponse("envelope carries neither result nor error".into()).into()
    })
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// Standard errors look like `{"code": <int>, "message": <string>}` and become
/// `ServerError`. Anything else falls back to `InvalidResponse` with the raw
/// JSON, except a bare string, which is kept as the message.
pub(crate) fn parse_jsonrpc_error(err: Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
        return CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        });
    }
    if let Some(message) = err.as_str() {
        return CoreError::Rpc(RpcError::ServerError {
            code: 0,
            message: message.to_owned(),
        });
    }
    CoreError::Rpc(RpcError::InvalidResponse(format!(
        "non-standard JSON-RPC error: {err}"
    )))
}
