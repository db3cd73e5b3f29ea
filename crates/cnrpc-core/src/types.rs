//! Typed results and query arguments.
//!
//! Each struct decodes from the *normalized* JSON of one operation (see
//! [`crate::normalize`]), not from the raw daemon response. Fields the daemon
//! omits on older builds carry `#[serde(default)]`; everything else is
//! required, so a decode error names the first field that is missing or has
//! the wrong type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::MAX_BLOCKS_PER_CALL;

// ==============================================================================
// Blocks
// ==============================================================================

/// Header returned by `getblockheaderbyhash`, `getblockheaderbyheight` and
/// `getlastblockheader`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub height: u64,
    pub prev_hash: String,
    pub timestamp: u64,
    pub difficulty: u64,
    pub nonce: u64,
    pub reward: u64,
    pub major_version: u8,
    pub minor_version: u8,
    #[serde(default)]
    pub depth: u64,
    #[serde(default)]
    pub num_txes: u64,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub orphan_status: bool,
}

/// One entry of `f_blocks_list_json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockShortHeader {
    pub hash: String,
    pub height: u64,
    pub timestamp: u64,
    pub difficulty: u64,
    pub cumul_size: u64,
    pub tx_count: u64,
}

/// Transaction summary embedded in a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTransaction {
    pub hash: String,
    pub fee: u64,
    pub amount_out: u64,
    pub size: u64,
}

/// Full block detail from `f_block_json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: String,
    pub height: u64,
    #[serde(rename = "prev_hash")]
    pub prev_hash: String,
    pub timestamp: u64,
    pub difficulty: u64,
    pub nonce: u64,
    pub reward: u64,
    #[serde(rename = "major_version")]
    pub major_version: u8,
    #[serde(rename = "minor_version")]
    pub minor_version: u8,
    #[serde(default)]
    pub depth: u64,
    #[serde(default, rename = "orphan_status")]
    pub orphan_status: bool,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub base_reward: u64,
    #[serde(default)]
    pub total_fee_amount: u64,
    #[serde(default)]
    pub already_generated_coins: String,
    #[serde(default)]
    pub already_generated_transactions: u64,
    #[serde(default)]
    pub size_median: u64,
    #[serde(default)]
    pub effective_size_median: u64,
    #[serde(default)]
    pub transactions_cumulative_size: u64,
    #[serde(default)]
    pub penalty: f64,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
}

/// Mining template from `getblocktemplate`.
///
/// `reserved_offset` is passed through as the daemon reports it: the byte
/// offset inside `blocktemplate_blob` where the requested reserve space starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    #[serde(rename = "blocktemplate_blob")]
    pub blob: String,
    pub difficulty: u64,
    pub height: u64,
    pub reserved_offset: u64,
}

/// Result of `/queryblocksdetailed`. Block bodies are kept as JSON; their
/// layout varies between daemon releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksDetailed {
    pub blocks: Vec<Value>,
    pub current_height: u64,
    pub full_offset: u64,
}

/// Result of `/queryblockslite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksLite {
    pub current_height: u64,
    pub full_offset: u64,
    pub items: Vec<LiteBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteBlock {
    /// Serialized block, lowercase hex.
    pub block: String,
    pub hash: String,
    pub transactions: Vec<TransactionPrefixRecord>,
}

/// A transaction hash paired with its prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPrefixRecord {
    pub hash: String,
    pub prefix: Value,
}

/// Result of `/getrawblocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlocks {
    pub items: Vec<RawBlock>,
    pub synced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Serialized block, hex.
    pub block: String,
    /// Serialized non-coinbase transactions, hex.
    #[serde(default)]
    pub transactions: Vec<String>,
}

// ==============================================================================
// Node
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    pub address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightInfo {
    pub height: u64,
    pub network_height: u64,
}

impl HeightInfo {
    /// True once the node has caught up with the height its peers report.
    pub fn is_synced(&self) -> bool {
        self.height >= self.network_height
    }
}

/// Selected fields of `/info`. Unrecognised fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub height: u64,
    pub network_height: u64,
    pub difficulty: u64,
    #[serde(default)]
    pub hashrate: u64,
    #[serde(default)]
    pub tx_count: u64,
    #[serde(default)]
    pub tx_pool_size: u64,
    #[serde(default)]
    pub alt_blocks_count: u64,
    #[serde(default)]
    pub incoming_connections_count: u64,
    #[serde(default)]
    pub outgoing_connections_count: u64,
    #[serde(default)]
    pub white_peerlist_size: u64,
    #[serde(default)]
    pub grey_peerlist_size: u64,
    #[serde(default)]
    pub last_known_block_index: u64,
    #[serde(default)]
    pub major_version: u8,
    #[serde(default)]
    pub minor_version: u8,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub synced: bool,
    #[serde(default)]
    pub testnet: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub upgrade_heights: Vec<u64>,
    #[serde(default)]
    pub supported_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peers {
    pub peers: Vec<String>,
    pub gray_peers: Vec<String>,
}

// ==============================================================================
// Transactions
// ==============================================================================

/// Result of `f_transaction_json`. The three parts are kept as JSON objects;
/// `tx` never contains the empty-string key the daemon sometimes emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub block: Map<String, Value>,
    pub tx: Map<String, Value>,
    pub tx_details: Map<String, Value>,
}

/// One entry of `f_on_transactions_pool_json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTransaction {
    pub hash: String,
    pub fee: u64,
    pub amount_out: u64,
    pub size: u64,
}

/// Result of `/get_pool_changes_lite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolChanges {
    pub added: Vec<TransactionPrefixRecord>,
    pub deleted: Vec<String>,
    /// Whether the tail block the caller supplied is still the chain tip.
    pub tail_block_current: bool,
}

/// Result of `/get_transactions_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsStatus {
    #[serde(rename = "transactionsInPool")]
    pub in_pool: Vec<String>,
    #[serde(rename = "transactionsInBlock")]
    pub in_block: Vec<String>,
    #[serde(rename = "transactionsUnknown")]
    pub unknown: Vec<String>,
}

/// Output indexes of one transaction, from `/get_global_indexes_for_range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIndexes {
    pub hash: String,
    pub indexes: Vec<u64>,
}

/// Decoy candidates for one amount, from `/getrandom_outs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomOutputSet {
    pub amount: u64,
    pub outs: Vec<RandomOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomOutput {
    #[serde(rename = "global_amount_index")]
    pub index: u64,
    #[serde(rename = "out_key")]
    pub key: String,
}

// ==============================================================================
// Wallet Sync
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSyncData {
    pub items: Vec<WalletSyncBlock>,
    pub synced: bool,
}

/// The part of a block a wallet needs for scanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSyncBlock {
    pub block_hash: String,
    pub block_height: u64,
    pub block_timestamp: u64,
    /// Absent when coinbase transactions were skipped.
    #[serde(default, rename = "coinbaseTX")]
    pub coinbase_tx: Option<Value>,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

// ==============================================================================
// Queries
// ==============================================================================

/// Arguments for `blocksDetailed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRangeQuery {
    /// Known block hashes, newest first. The daemon answers from the first
    /// one it recognises.
    pub block_hashes: Vec<String>,
    pub timestamp: u64,
    pub block_count: u64,
}

impl BlockRangeQuery {
    pub fn new(block_hashes: Vec<String>) -> Self {
        Self {
            block_hashes,
            timestamp: 0,
            block_count: MAX_BLOCKS_PER_CALL,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_block_count(mut self, block_count: u64) -> Self {
        self.block_count = block_count;
        self
    }
}

/// Cursor for `rawBlocks` and `walletSyncData`.
///
/// Every field is sent. Precedence between them is the daemon's: hash
/// checkpoints override the timestamp, which overrides the start height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    pub block_hash_checkpoints: Vec<String>,
    pub start_height: u64,
    pub start_timestamp: u64,
    pub block_count: u64,
    pub skip_coinbase_transactions: bool,
}

impl Default for SyncQuery {
    fn default() -> Self {
        Self {
            block_hash_checkpoints: Vec::new(),
            start_height: 0,
            start_timestamp: 0,
            block_count: MAX_BLOCKS_PER_CALL,
            skip_coinbase_transactions: false,
        }
    }
}

impl SyncQuery {
    pub fn from_height(start_height: u64) -> Self {
        Self {
            start_height,
            ..Self::default()
        }
    }

    pub fn from_timestamp(start_timestamp: u64) -> Self {
        Self {
            start_timestamp,
            ..Self::default()
        }
    }

    pub fn from_checkpoints(block_hash_checkpoints: Vec<String>) -> Self {
        Self {
            block_hash_checkpoints,
            ..Self::default()
        }
    }

    pub fn with_block_count(mut self, block_count: u64) -> Self {
        self.block_count = block_count;
        self
    }

    pub fn skip_coinbase(mut self, skip: bool) -> Self {
        self.skip_coinbase_transactions = skip;
        self
    }
}
