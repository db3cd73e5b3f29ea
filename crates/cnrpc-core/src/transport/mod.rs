//! HTTP transport abstraction.
//!
//! The client only ever needs two verbs from the network: fetch a JSON
//! document with GET, or POST a JSON body and read JSON back. [`Transport`]
//! captures exactly that so the operation catalog and normalizer can be
//! exercised without a live daemon.

mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::NetworkError;

/// Minimal request surface the daemon client depends on.
///
/// Implementations own timeouts, TLS, connection reuse and request headers.
/// Errors are reported as [`NetworkError`] and are never retried by the
/// caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` and parse the body as JSON.
    async fn get(&self, path: &str) -> Result<Value, NetworkError>;

    /// POST `body` as JSON to `path` and parse the response body as JSON.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, NetworkError>;
}
