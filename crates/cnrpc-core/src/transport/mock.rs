use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::NetworkError;
use crate::protocol::JSON_RPC_PATH;

use super::Transport;

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Get { path: String },
    Post { path: String, body: Value },
}

/// Canned outcome for one route.
enum Canned {
    Body(Value),
    Timeout,
}

/// A scripted [`Transport`] for tests. Routes are keyed by path, and JSON-RPC
/// calls are keyed by method so several RPC operations can share one mock.
/// Every request is recorded, including ones with no canned answer.
pub struct MockTransport {
    routes: HashMap<String, Canned>,
    rpc_methods: HashMap<String, Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            routes: HashMap::new(),
            rpc_methods: HashMap::new(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);
    }

    fn answer(canned: Option<&Canned>, path: &str) -> Result<Value, NetworkError> {
        match canned {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Timeout) => Err(NetworkError::Timeout {
                path: path.to_owned(),
                timeout_ms: 2000,
            }),
            None => Err(NetworkError::HttpStatus {
                path: path.to_owned(),
                status: 404,
            }),
        }
    }
}

pub struct MockTransportBuilder {
    routes: HashMap<String, Canned>,
    rpc_methods: HashMap<String, Canned>,
}

impl MockTransportBuilder {
    /// Answer any GET or POST to `path` with `body`.
    pub fn with_route(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(path.to_owned(), Canned::Body(body));
        self
    }

    /// Answer JSON-RPC calls to `method` with the full envelope `body`.
    pub fn with_rpc(mut self, method: &str, body: Value) -> Self {
        self.rpc_methods.insert(method.to_owned(), Canned::Body(body));
        self
    }

    /// Answer JSON-RPC calls to `method` with `{"jsonrpc": "2.0", "result": result}`.
    pub fn with_rpc_result(self, method: &str, result: Value) -> Self {
        self.with_rpc(
            method,
            serde_json::json!({"jsonrpc": "2.0", "id": 0, "result": result}),
        )
    }

    pub fn with_timeout(mut self, path: &str) -> Self {
        self.routes.insert(path.to_owned(), Canned::Timeout);
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            routes: self.routes,
            rpc_methods: self.rpc_methods,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, NetworkError> {
        self.record(RecordedRequest::Get {
            path: path.to_owned(),
        });
        Self::answer(self.routes.get(path), path)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, NetworkError> {
        self.record(RecordedRequest::Post {
            path: path.to_owned(),
            body: body.clone(),
        });
        if path == JSON_RPC_PATH {
            if let Some(canned) = body
                .get("method")
                .and_then(Value::as_str)
                .and_then(|method| self.rpc_methods.get(method))
            {
                return Self::answer(Some(canned), path);
            }
        }
        Self::answer(self.routes.get(path), path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn routes_rpc_calls_by_method() {
        let mock = MockTransport::builder()
            .with_rpc_result("getblockcount", json!({"count": 5}))
            .with_route("/height", json!({"height": 4, "status": "OK"}))
            .build();

        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "getblockcount", "params": {}});
        let answer = mock.post(JSON_RPC_PATH, &body).await.expect("should answer");
        assert_eq!(answer["result"]["count"], json!(5));

        let height = mock.get("/height").await.expect("should answer");
        assert_eq!(height["height"], json!(4));

        assert_eq!(mock.request_count(), 2);
        assert_eq!(
            mock.requests()[1],
            RecordedRequest::Get {
                path: "/height".into()
            }
        );
    }

    #[tokio::test]
    async fn unknown_routes_and_timeouts_fail() {
        let mock = MockTransport::builder().with_timeout("/info").build();
        assert!(matches!(
            mock.get("/info").await,
            Err(NetworkError::Timeout { .. })
        ));
        assert!(matches!(
            mock.get("/peers").await,
            Err(NetworkError::HttpStatus { status: 404, .. })
        ));
    }
}
