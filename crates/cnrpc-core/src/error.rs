//! Error types for the daemon client.
//!
//! Every failure reaches the caller as a [`CoreError`]. The nested enums keep
//! the four failure families apart: bad arguments caught locally, JSON-RPC
//! errors reported by the daemon, responses the normalizer rejected, and
//! transport failures.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    Argument(#[from] ArgumentError),

    #[error("daemon RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("{operation}: {source}")]
    Normalize {
        operation: &'static str,
        /// Whether the operation's response carries an in-band status.
        status_checked: bool,
        #[source]
        source: NormalizeError,
    },

    #[error("network failure: {0}")]
    Network(#[from] NetworkError),

    #[error("invalid {operation} result: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// True when a status-checked response failed: the status was missing or
    /// not `ok`, or an expected key was absent.
    pub fn is_status_error(&self) -> bool {
        matches!(
            self,
            Self::Normalize {
                status_checked: true,
                source: NormalizeError::MissingStatus
                    | NormalizeError::StatusNotOk { .. }
                    | NormalizeError::MissingKey { .. },
                ..
            }
        )
    }
}

/// Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("missing required argument `{0}`")]
    Missing(&'static str),

    #[error("argument `{0}` must be an array")]
    NotAnArray(&'static str),

    #[error("argument `{name}` must be numeric, got {value}")]
    NotNumeric { name: &'static str, value: String },

    #[error("argument `{name}` is not a 64-character hex hash: {value}")]
    InvalidHash { name: &'static str, value: String },

    #[error("argument `{0}` must be a non-empty hex string")]
    InvalidHex(&'static str),

    #[error("argument `{name}` must be {expected}")]
    InvalidType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("operation `{operation}` does not take argument `{name}`")]
    UnknownArgument {
        operation: &'static str,
        name: String,
    },

    #[error("operation arguments must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),
}

/// Reasons a normalizer rule rejects a daemon response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("response carries no status field")]
    MissingStatus,

    #[error("daemon reported status `{status}`")]
    StatusNotOk { status: String },

    #[error("response is missing expected key `{key}`")]
    MissingKey { key: String },

    #[error("`{key}` must be {expected}")]
    UnexpectedType { key: String, expected: &'static str },

    #[error("`{key}` holds {value}, which is not a byte")]
    InvalidByte { key: String, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("request to {path} timed out after {timeout_ms} ms")]
    Timeout { path: String, timeout_ms: u64 },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{path} answered HTTP {status}")]
    HttpStatus { path: String, status: u16 },

    #[error("malformed response body from {path}: {message}")]
    MalformedBody { path: String, message: String },
}
