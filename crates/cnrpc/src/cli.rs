use clap::{Parser, Subcommand};

/// cnrpc: query a CryptoNote daemon over its HTTP and JSON-RPC endpoints.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon host name or address.
    #[arg(long, default_value = "127.0.0.1", env = "CNRPC_HOST")]
    pub host: String,

    /// Daemon RPC port.
    #[arg(long, default_value = "11898", env = "CNRPC_PORT")]
    pub port: u16,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value = "2000", env = "CNRPC_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Connect over HTTPS.
    #[arg(long, env = "CNRPC_TLS")]
    pub tls: bool,

    /// Close the connection after every request.
    #[arg(long, env = "CNRPC_NO_KEEP_ALIVE")]
    pub no_keep_alive: bool,

    /// Value of the User-Agent header (defaults to `cnrpc/<version>`).
    #[arg(long, env = "CNRPC_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Maximum outbound requests per second.
    #[arg(long, env = "CNRPC_RPS")]
    pub requests_per_second: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every supported operation with its endpoint and arguments.
    Operations,

    /// Run one operation and print its normalized JSON result.
    Call {
        /// Operation name, e.g. `blockCount` or `walletSyncData`.
        operation: String,

        /// Arguments as a JSON object, e.g. `{"height": 100}`.
        #[arg(long)]
        args: Option<String>,
    },

    /// Print the node's sync state.
    Status,
}
