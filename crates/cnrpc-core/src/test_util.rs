//! Shared fixtures for `cnrpc-core` unit tests.
//!
//! Canned daemon responses live here so the catalog, normalizer and client
//! tests agree on what the daemon sends.

use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::transport::mock::MockTransport;
use crate::DaemonClient;

// ==============================================================================
// Hashes
// ==============================================================================

pub const HASH_A: &str = "7d2ab8ba0b1f4b0c6e1a9b2d0d5b8a8e5a1c6a0cdb0f7e0c1a6f52b4a0f0a1a1";
pub const HASH_B: &str = "0f3c25b4a2dd1c2e1f38bf41cf8a2c5ab6d0f8e3c4a1b2c3d4e5f60718293a4b";

/// A 64-character string of one repeated character. Only hex digits make a
/// valid hash.
pub fn hash_of(c: char) -> String {
    std::iter::repeat(c).take(64).collect()
}

// ==============================================================================
// Client
// ==============================================================================

pub fn client_with(mock: MockTransport) -> DaemonClient<MockTransport> {
    DaemonClient::with_transport(ClientConfig::default(), mock)
}

// ==============================================================================
// Canned Responses
// ==============================================================================

pub fn block_header_json(height: u64) -> Value {
    json!({
        "block_size": 320,
        "depth": 2,
        "difficulty": 250_000,
        "hash": HASH_A,
        "height": height,
        "major_version": 7,
        "minor_version": 0,
        "nonce": 123_456,
        "num_txes": 1,
        "orphan_status": false,
        "prev_hash": HASH_B,
        "reward": 2_900_000,
        "timestamp": 1_600_000_000u64
    })
}

pub fn node_info_response() -> Value {
    json!({
        "alt_blocks_count": 0,
        "difficulty": 250_000,
        "grey_peerlist_size": 1200,
        "hashrate": 8333,
        "height": 3_000_001,
        "incoming_connections_count": 4,
        "last_known_block_index": 3_000_000,
        "major_version": 7,
        "minor_version": 0,
        "network_height": 3_000_001,
        "outgoing_connections_count": 8,
        "start_time": 1_600_000_000u64,
        "supported_height": 3_500_000,
        "synced": true,
        "testnet": false,
        "tx_count": 5_000_000,
        "tx_pool_size": 3,
        "upgrade_heights": [187_000, 350_000, 440_000],
        "version": "1.1.0",
        "white_peerlist_size": 50,
        "status": "OK"
    })
}

pub fn blocks_lite_response() -> Value {
    json!({
        "currentHeight": 1001,
        "fullOffset": 1000,
        "items": [
            {
                "blockShortInfo.block": [1, 0, 255],
                "blockShortInfo.blockId": HASH_A,
                "blockShortInfo.txPrefixes": [
                    {
                        "transactionPrefixInfo.txHash": HASH_B,
                        "transactionPrefixInfo.txPrefix": {"version": 1, "unlock_time": 0}
                    }
                ]
            },
            {
                "blockShortInfo.block": [16],
                "blockShortInfo.blockId": HASH_B,
                "blockShortInfo.txPrefixes": []
            }
        ],
        "status": "OK"
    })
}
