use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{CoreError, NetworkError};

use super::Transport;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// `reqwest`-backed transport for a daemon's HTTP(S) endpoint.
///
/// One pooled `reqwest::Client` is shared by every request. With keep-alive
/// disabled the pool keeps no idle connections and each request asks the
/// daemon to close the connection.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    keep_alive: bool,
    timeout_ms: u64,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let config = config.clone().validated()?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .tcp_nodelay(true);
        builder = if config.keep_alive {
            builder.pool_max_idle_per_host(32)
        } else {
            builder.pool_max_idle_per_host(0)
        };
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;

        let limiter = match config.requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::Config("requests_per_second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            base_url: config.base_url(),
            keep_alive: config.keep_alive,
            timeout_ms: config.timeout_ms(),
            limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether the request was held back by the rate limiter.
    async fn wait_for_rate_limit(&self) -> bool {
        let Some(limiter) = &self.limiter else {
            return false;
        };
        if limiter.check().is_ok() {
            return false;
        }
        warn!(base_url = %self.base_url, "rate limit reached, delaying request");
        limiter.until_ready().await;
        true
    }

    async fn execute(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<Value, NetworkError> {
        self.wait_for_rate_limit().await;

        let builder = if self.keep_alive {
            builder
        } else {
            builder.header(header::CONNECTION, "close")
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(path, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(path, e))?;
        debug!(http.path = path, %status, body_len = body.len(), "daemon response");
        trace!(http.path = path, body = %body, "daemon response body");

        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                path: path.to_owned(),
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| NetworkError::MalformedBody {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }

    fn map_reqwest_error(&self, path: &str, err: reqwest::Error) -> NetworkError {
        if err.is_timeout() {
            NetworkError::Timeout {
                path: path.to_owned(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            NetworkError::Transport(err)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, NetworkError> {
        debug!(http.method = "GET", http.path = path, "daemon request");
        let builder = self
            .client
            .get(self.url(path))
            .header(header::ACCEPT, "application/json");
        self.execute(path, builder).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, NetworkError> {
        debug!(http.method = "POST", http.path = path, "daemon request");
        trace!(http.path = path, body = %body, "daemon request body");
        let builder = self
            .client
            .post(self.url(path))
            .header(header::ACCEPT, "application/json")
            .json(body);
        self.execute(path, builder).await
    }
}
