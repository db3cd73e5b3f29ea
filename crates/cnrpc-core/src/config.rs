//! Immutable connection settings for a [`DaemonClient`](crate::DaemonClient).

use std::time::Duration;

use reqwest::Url;

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 11898;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_USER_AGENT: &str = concat!("cnrpc/", env!("CARGO_PKG_VERSION"));

/// Where and how to reach the daemon.
///
/// Built once and never mutated afterwards. The `with_*` methods consume and
/// return the value so a configuration reads as one expression:
///
/// ```
/// use std::time::Duration;
/// use cnrpc_core::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_host("node.example.org")
///     .with_tls(true)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "https://node.example.org:11898");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub tls: bool,
    pub keep_alive: bool,
    /// Sent as the `User-Agent` header on every request.
    pub user_agent: String,
    /// Outbound request budget. `None` disables throttling.
    pub requests_per_second: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            tls: false,
            keep_alive: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            requests_per_second: None,
        }
    }
}

impl ClientConfig {
    /// Parse an `http://host[:port]` or `https://host[:port]` URL. A missing
    /// port falls back to [`DEFAULT_PORT`]; paths and queries are rejected.
    pub fn from_url(url: &str) -> Result<Self, CoreError> {
        let parsed = Url::parse(url).map_err(|e| {
            CoreError::Config(format!("invalid daemon url `{url}`: expected HTTP(S) URL ({e})"))
        })?;
        let tls = match parsed.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(CoreError::Config(format!(
                    "unsupported daemon url scheme `{other}`; expected http or https"
                )));
            }
        };
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| CoreError::Config(format!("daemon url `{url}` has no host")))?;
        if !matches!(parsed.path(), "" | "/") || parsed.query().is_some() {
            return Err(CoreError::Config(format!(
                "daemon url `{url}` must not carry a path or query"
            )));
        }

        Self::default()
            .with_host(host.trim_start_matches('[').trim_end_matches(']'))
            .with_port(explicit_port(&parsed, url).unwrap_or(DEFAULT_PORT))
            .with_tls(tls)
            .validated()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_requests_per_second(mut self, limit: Option<u32>) -> Self {
        self.requests_per_second = limit;
        self
    }

    /// Reject settings the transport cannot honour.
    pub fn validated(self) -> Result<Self, CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config("host must not be empty".to_owned()));
        }
        if self.port == 0 {
            return Err(CoreError::Config("port must be non-zero".to_owned()));
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config("timeout must be at least 1 ms".to_owned()));
        }
        if self.requests_per_second == Some(0) {
            return Err(CoreError::Config(
                "requests_per_second must be at least 1".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        if self.host.contains(':') {
            format!("{scheme}://[{}]:{}", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}", self.host, self.port)
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

// `Url` folds a scheme's well-known port into `None`, so `https://host:443`
// and `https://host` parse alike. Look at the authority text to tell them apart.
fn explicit_port(parsed: &Url, raw: &str) -> Option<u16> {
    if let Some(port) = parsed.port() {
        return Some(port);
    }
    let known = parsed.port_or_known_default()?;
    let authority = raw.split_once("://")?.1;
    let authority = authority.split(['/', '?', '#']).next()?;
    authority.ends_with(&format!(":{known}")).then_some(known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 11898);
        assert_eq!(config.timeout_ms(), 2000);
        assert!(!config.tls);
        assert!(config.keep_alive);
        assert!(config.user_agent.starts_with("cnrpc/"));
        assert_eq!(config.requests_per_second, None);
        assert_eq!(config.base_url(), "http://127.0.0.1:11898");
    }

    #[test]
    fn from_url_reads_scheme_host_and_port() {
        let config = ClientConfig::from_url("https://node.example.org:443").expect("should parse");
        assert!(config.tls);
        assert_eq!(config.host, "node.example.org");
        assert_eq!(config.port, 443);
        assert_eq!(config.base_url(), "https://node.example.org:443");
    }

    #[test]
    fn from_url_defaults_the_port() {
        let config = ClientConfig::from_url("http://10.0.0.2").expect("should parse");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn from_url_handles_ipv6_hosts() {
        let config = ClientConfig::from_url("http://[::1]:11898").expect("should parse");
        assert_eq!(config.host, "::1");
        assert_eq!(config.base_url(), "http://[::1]:11898");
    }

    #[test]
    fn from_url_rejects_other_schemes() {
        let err = ClientConfig::from_url("ftp://example.com").expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported daemon url scheme"));
    }

    #[test]
    fn from_url_rejects_paths() {
        let err = ClientConfig::from_url("http://127.0.0.1:11898/json_rpc")
            .expect_err("must reject paths");
        assert!(err.to_string().contains("must not carry a path"));
    }

    #[test]
    fn validated_rejects_zero_values() {
        assert!(ClientConfig::default().with_port(0).validated().is_err());
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validated()
            .is_err());
        assert!(ClientConfig::default()
            .with_requests_per_second(Some(0))
            .validated()
            .is_err());
        assert!(ClientConfig::default().with_host(" ").validated().is_err());
    }
}
