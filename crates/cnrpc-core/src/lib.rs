//! Client for the HTTP and JSON-RPC interface of CryptoNote-family daemons.
//!
//! The crate is organised around a declarative [`catalog`] of operations.
//! Each entry names its endpoint, its arguments, and the [`normalize::Rule`]
//! that turns the daemon's raw JSON into a stable shape. [`DaemonClient`]
//! drives the table over any [`transport::Transport`].

pub mod catalog;
mod client;
pub mod config;
pub mod error;
pub mod normalize;
mod protocol;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_util;

pub use catalog::Operation;
pub use client::DaemonClient;
pub use config::ClientConfig;
pub use error::{ArgumentError, CoreError, NetworkError, NormalizeError, RpcError};
