//! The operation catalog.
//!
//! One table entry per daemon operation: which endpoint it hits, which
//! arguments it takes and how they map onto the wire, and which normalizer
//! [`Rule`] shapes its result. Dispatch in [`DaemonClient`](crate::DaemonClient)
//! is driven entirely by this table.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ArgumentError;
use crate::normalize::{self, Rule};
use crate::protocol::{JsonRpcRequest, JSON_RPC_PATH};

/// Most blocks a range or sync query may ask for in one call.
pub const MAX_BLOCKS_PER_CALL: u64 = 100;

// ==============================================================================
// Operations
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Block,
    BlockCount,
    BlockHeaderByHash,
    BlockHeaderByHeight,
    LastBlockHeader,
    BlockShortHeaders,
    BlockTemplate,
    SubmitBlock,
    Transaction,
    TransactionPool,
    Fee,
    Height,
    Info,
    Peers,
    GlobalIndexes,
    GlobalIndexesForRange,
    BlocksDetailed,
    BlocksLite,
    PoolChanges,
    RandomOutputs,
    RawBlocks,
    SubmitTransaction,
    TransactionsStatus,
    WalletSyncData,
}

impl Operation {
    /// Every operation, in catalog order.
    pub const ALL: [Operation; 24] = [
        Self::Block,
        Self::BlockCount,
        Self::BlockHeaderByHash,
        Self::BlockHeaderByHeight,
        Self::LastBlockHeader,
        Self::BlockShortHeaders,
        Self::BlockTemplate,
        Self::SubmitBlock,
        Self::Transaction,
        Self::TransactionPool,
        Self::Fee,
        Self::Height,
        Self::Info,
        Self::Peers,
        Self::GlobalIndexes,
        Self::GlobalIndexesForRange,
        Self::BlocksDetailed,
        Self::BlocksLite,
        Self::PoolChanges,
        Self::RandomOutputs,
        Self::RawBlocks,
        Self::SubmitTransaction,
        Self::TransactionsStatus,
        Self::WalletSyncData,
    ];

    pub fn spec(self) -> &'static OperationSpec {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look an operation up by its caller-facing name, e.g. `blockCount`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==============================================================================
// Table Entry Types
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Bare GET to a fixed path.
    Get(&'static str),
    /// JSON-RPC method whose params are an object keyed by wire name.
    JsonRpc(&'static str),
    /// JSON-RPC method whose params are a positional array.
    JsonRpcPositional(&'static str),
    /// POST of a plain JSON body to a fixed path.
    Post(&'static str),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get(path) => write!(f, "GET {path}"),
            Self::JsonRpc(method) | Self::JsonRpcPositional(method) => {
                write!(f, "RPC {method}")
            }
            Self::Post(path) => write!(f, "POST {path}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// 64 hex characters.
    Hash,
    HashList,
    /// Non-empty, even-length hex blob.
    Hex,
    /// Non-empty string (wallet address).
    Address,
    Unsigned,
    UnsignedList,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    DefaultU64(u64),
    DefaultBool(bool),
    DefaultEmptyList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    /// Caller-facing name.
    pub name: &'static str,
    /// Name the daemon expects.
    pub wire: &'static str,
    pub kind: ArgKind,
    pub presence: Presence,
    /// Larger values are clamped to this.
    pub cap: Option<u64>,
}

impl ArgSpec {
    const fn required(name: &'static str, wire: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            wire,
            kind,
            presence: Presence::Required,
            cap: None,
        }
    }

    const fn defaulted(
        name: &'static str,
        wire: &'static str,
        kind: ArgKind,
        presence: Presence,
    ) -> Self {
        Self {
            name,
            wire,
            kind,
            presence,
            cap: None,
        }
    }

    const fn capped(mut self, cap: u64) -> Self {
        self.cap = Some(cap);
        self
    }

    fn default_value(&self) -> Option<Value> {
        match self.presence {
            Presence::Required => None,
            Presence::DefaultU64(n) => Some(Value::from(n)),
            Presence::DefaultBool(b) => Some(Value::Bool(b)),
            Presence::DefaultEmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub args: &'static [ArgSpec],
    pub rule: Rule,
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    Get { path: &'static str },
    Post { path: &'static str, body: Value },
}

impl OperationSpec {
    /// Validate caller arguments and map them onto wire names, filling in
    /// defaults. `null` is treated as "no arguments".
    pub fn build_params(&self, args: &Value) -> Result<Map<String, Value>, ArgumentError> {
        let empty = Map::new();
        let provided = match args {
            Value::Null => &empty,
            Value::Object(object) => object,
            _ => return Err(ArgumentError::NotAnObject),
        };

        if let Some(unknown) = provided
            .keys()
            .find(|key| !self.args.iter().any(|arg| arg.name == key.as_str()))
        {
            return Err(ArgumentError::UnknownArgument {
                operation: self.name,
                name: unknown.clone(),
            });
        }

        let mut params = Map::with_capacity(self.args.len());
        for arg in self.args {
            let value = match provided.get(arg.name).filter(|v| !v.is_null()) {
                Some(value) => validate_arg(self.name, arg, value)?,
                None => match (arg.presence, arg.default_value()) {
                    (Presence::Required, _) => return Err(ArgumentError::Missing(arg.name)),
                    (_, Some(default)) => default,
                    (_, None) => continue,
                },
            };
            params.insert(arg.wire.to_owned(), value);
        }
        Ok(params)
    }

    /// Validate arguments and build the request. `id` is the JSON-RPC request
    /// id and is ignored by plain endpoints.
    pub fn build_request(&self, args: &Value, id: u64) -> Result<WireRequest, ArgumentError> {
        let mut params = self.build_params(args)?;
        let request = match self.endpoint {
            Endpoint::Get(path) => WireRequest::Get { path },
            Endpoint::Post(path) => WireRequest::Post {
                path,
                body: Value::Object(params),
            },
            Endpoint::JsonRpc(method) => WireRequest::Post {
                path: JSON_RPC_PATH,
                body: JsonRpcRequest::new(id, method, Value::Object(params)).to_value(),
            },
            Endpoint::JsonRpcPositional(method) => {
                let positional = self
                    .args
                    .iter()
                    .filter_map(|arg| params.remove(arg.wire))
                    .collect();
                WireRequest::Post {
                    path: JSON_RPC_PATH,
                    body: JsonRpcRequest::new(id, method, Value::Array(positional)).to_value(),
                }
            }
        };
        Ok(request)
    }
}

// ==============================================================================
// Argument Validation
// ==============================================================================

fn validate_arg(operation: &str, arg: &ArgSpec, value: &Value) -> Result<Value, ArgumentError> {
    match arg.kind {
        ArgKind::Hash => validate_hash(arg.name, value),
        ArgKind::HashList => list(arg.name, value)?
            .iter()
            .map(|item| validate_hash(arg.name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ArgKind::Hex => {
            let hex = value
                .as_str()
                .filter(|s| !s.is_empty() && s.len() % 2 == 0 && is_hex(s))
                .ok_or(ArgumentError::InvalidHex(arg.name))?;
            Ok(Value::String(hex.to_ascii_lowercase()))
        }
        ArgKind::Address => value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_owned()))
            .ok_or(ArgumentError::InvalidType {
                name: arg.name,
                expected: "a non-empty string",
            }),
        ArgKind::Unsigned => {
            let n = unsigned(arg.name, value)?;
            Ok(Value::from(apply_cap(operation, arg, n)))
        }
        ArgKind::UnsignedList => list(arg.name, value)?
            .iter()
            .map(|item| unsigned(arg.name, item).map(Value::from))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ArgKind::Bool => value
            .as_bool()
            .map(Value::Bool)
            .ok_or(ArgumentError::InvalidType {
                name: arg.name,
                expected: "a boolean",
            }),
    }
}

fn list<'a>(name: &'static str, value: &'a Value) -> Result<&'a Vec<Value>, ArgumentError> {
    value.as_array().ok_or(ArgumentError::NotAnArray(name))
}

fn validate_hash(name: &'static str, value: &Value) -> Result<Value, ArgumentError> {
    match value.as_str() {
        Some(s) if s.len() == 64 && is_hex(s) => Ok(Value::String(s.to_ascii_lowercase())),
        _ => Err(ArgumentError::InvalidHash {
            name,
            value: value.to_string(),
        }),
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Accept a non-negative integer, or a string holding one.
fn unsigned(name: &'static str, value: &Value) -> Result<u64, ArgumentError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ArgumentError::NotNumeric {
        name,
        value: value.to_string(),
    })
}

fn apply_cap(operation: &str, arg: &ArgSpec, n: u64) -> u64 {
    match arg.cap {
        Some(cap) if n > cap => {
            warn!(
                operation,
                argument = arg.name,
                requested = n,
                cap,
                "argument above per-call cap; clamping"
            );
            cap
        }
        _ => n,
    }
}

// ==============================================================================
// The Table
// ==============================================================================

const HASH: &[ArgSpec] = &[ArgSpec::required("hash", "hash", ArgKind::Hash)];
const HEIGHT: &[ArgSpec] = &[ArgSpec::required("height", "height", ArgKind::Unsigned)];

const SYNC_ARGS: &[ArgSpec] = &[
    ArgSpec::defaulted(
        "blockHashCheckpoints",
        "blockHashCheckpoints",
        ArgKind::HashList,
        Presence::DefaultEmptyList,
    ),
    ArgSpec::defaulted(
        "startHeight",
        "startHeight",
        ArgKind::Unsigned,
        Presence::DefaultU64(0),
    ),
    ArgSpec::defaulted(
        "startTimestamp",
        "startTimestamp",
        ArgKind::Unsigned,
        Presence::DefaultU64(0),
    ),
    ArgSpec::defaulted(
        "blockCount",
        "blockCount",
        ArgKind::Unsigned,
        Presence::DefaultU64(MAX_BLOCKS_PER_CALL),
    )
    .capped(MAX_BLOCKS_PER_CALL),
    ArgSpec::defaulted(
        "skipCoinbaseTransactions",
        "skipCoinbaseTransactions",
        ArgKind::Bool,
        Presence::DefaultBool(false),
    ),
];

static CATALOG: [OperationSpec; 24] = [
    OperationSpec {
        operation: Operation::Block,
        name: "block",
        endpoint: Endpoint::JsonRpc("f_block_json"),
        args: HASH,
        rule: Rule::Field("block"),
    },
    OperationSpec {
        operation: Operation::BlockCount,
        name: "blockCount",
        endpoint: Endpoint::JsonRpc("getblockcount"),
        args: &[],
        rule: Rule::Field("count"),
    },
    OperationSpec {
        operation: Operation::BlockHeaderByHash,
        name: "blockHeaderByHash",
        endpoint: Endpoint::JsonRpc("getblockheaderbyhash"),
        args: HASH,
        rule: Rule::Field("block_header"),
    },
    OperationSpec {
        operation: Operation::BlockHeaderByHeight,
        name: "blockHeaderByHeight",
        endpoint: Endpoint::JsonRpc("getblockheaderbyheight"),
        args: HEIGHT,
        rule: Rule::Field("block_header"),
    },
    OperationSpec {
        operation: Operation::LastBlockHeader,
        name: "lastBlockHeader",
        endpoint: Endpoint::JsonRpc("getlastblockheader"),
        args: &[],
        rule: Rule::Field("block_header"),
    },
    OperationSpec {
        operation: Operation::BlockShortHeaders,
        name: "blockShortHeaders",
        endpoint: Endpoint::JsonRpc("f_blocks_list_json"),
        args: HEIGHT,
        rule: Rule::Field("blocks"),
    },
    OperationSpec {
        operation: Operation::BlockTemplate,
        name: "blockTemplate",
        endpoint: Endpoint::JsonRpc("getblocktemplate"),
        args: &[
            ArgSpec::required("address", "wallet_address", ArgKind::Address),
            ArgSpec::required("reserveSize", "reserve_size", ArgKind::Unsigned),
        ],
        rule: Rule::Status(&[
            "blocktemplate_blob",
            "difficulty",
            "height",
            "reserved_offset",
        ]),
    },
    OperationSpec {
        operation: Operation::SubmitBlock,
        name: "submitBlock",
        endpoint: Endpoint::JsonRpcPositional("submitblock"),
        args: &[ArgSpec::required("blob", "blob", ArgKind::Hex)],
        rule: Rule::StatusOnly,
    },
    OperationSpec {
        operation: Operation::Transaction,
        name: "transaction",
        endpoint: Endpoint::JsonRpc("f_transaction_json"),
        args: HASH,
        rule: Rule::Custom(normalize::transaction),
    },
    OperationSpec {
        operation: Operation::TransactionPool,
        name: "transactionPool",
        endpoint: Endpoint::JsonRpc("f_on_transactions_pool_json"),
        args: &[],
        rule: Rule::Field("transactions"),
    },
    OperationSpec {
        operation: Operation::Fee,
        name: "fee",
        endpoint: Endpoint::Get("/fee"),
        args: &[],
        rule: Rule::Status(&["address", "amount"]),
    },
    OperationSpec {
        operation: Operation::Height,
        name: "height",
        endpoint: Endpoint::Get("/height"),
        args: &[],
        rule: Rule::Status(&["height", "network_height"]),
    },
    OperationSpec {
        operation: Operation::Info,
        name: "info",
        endpoint: Endpoint::Get("/info"),
        args: &[],
        rule: Rule::StatusCustom(normalize::node_info),
    },
    OperationSpec {
        operation: Operation::Peers,
        name: "peers",
        endpoint: Endpoint::Get("/peers"),
        args: &[],
        rule: Rule::Status(&["peers", "gray_peers"]),
    },
    OperationSpec {
        operation: Operation::GlobalIndexes,
        name: "globalIndexes",
        endpoint: Endpoint::Post("/get_o_indexes"),
        args: &[ArgSpec::required("hash", "txid", ArgKind::Hash)],
        rule: Rule::StatusField("o_indexes"),
    },
    OperationSpec {
        operation: Operation::GlobalIndexesForRange,
        name: "globalIndexesForRange",
        endpoint: Endpoint::Post("/get_global_indexes_for_range"),
        args: &[
            ArgSpec::required("startHeight", "startHeight", ArgKind::Unsigned),
            ArgSpec::required("endHeight", "endHeight", ArgKind::Unsigned),
        ],
        rule: Rule::StatusCustom(normalize::global_indexes_for_range),
    },
    OperationSpec {
        operation: Operation::BlocksDetailed,
        name: "blocksDetailed",
        endpoint: Endpoint::Post("/queryblocksdetailed"),
        args: &[
            ArgSpec::required("blockHashes", "blockIds", ArgKind::HashList),
            ArgSpec::defaulted(
                "timestamp",
                "timestamp",
                ArgKind::Unsigned,
                Presence::DefaultU64(0),
            ),
            ArgSpec::defaulted(
                "blockCount",
                "blockCount",
                ArgKind::Unsigned,
                Presence::DefaultU64(MAX_BLOCKS_PER_CALL),
            )
            .capped(MAX_BLOCKS_PER_CALL),
        ],
        rule: Rule::Status(&["blocks", "currentHeight", "fullOffset"]),
    },
    OperationSpec {
        operation: Operation::BlocksLite,
        name: "blocksLite",
        endpoint: Endpoint::Post("/queryblockslite"),
        args: &[
            ArgSpec::required("blockHashes", "blockIds", ArgKind::HashList),
            ArgSpec::defaulted(
                "timestamp",
                "timestamp",
                ArgKind::Unsigned,
                Presence::DefaultU64(0),
            ),
        ],
        rule: Rule::StatusCustom(normalize::blocks_lite),
    },
    OperationSpec {
        operation: Operation::PoolChanges,
        name: "poolChanges",
        endpoint: Endpoint::Post("/get_pool_changes_lite"),
        args: &[
            ArgSpec::required("tailBlockHash", "tailBlockId", ArgKind::Hash),
            ArgSpec::defaulted(
                "knownTransactionHashes",
                "knownTxsIds",
                ArgKind::HashList,
                Presence::DefaultEmptyList,
            ),
        ],
        rule: Rule::StatusCustom(normalize::pool_changes),
    },
    OperationSpec {
        operation: Operation::RandomOutputs,
        name: "randomOutputs",
        endpoint: Endpoint::Post("/getrandom_outs"),
        args: &[
            ArgSpec::required("amounts", "amounts", ArgKind::UnsignedList),
            ArgSpec::required("mixin", "outs_count", ArgKind::Unsigned),
        ],
        rule: Rule::StatusField("outs"),
    },
    OperationSpec {
        operation: Operation::RawBlocks,
        name: "rawBlocks",
        endpoint: Endpoint::Post("/getrawblocks"),
        args: SYNC_ARGS,
        rule: Rule::Status(&["items", "synced"]),
    },
    OperationSpec {
        operation: Operation::SubmitTransaction,
        name: "submitTransaction",
        endpoint: Endpoint::Post("/sendrawtransaction"),
        args: &[ArgSpec::required("transaction", "tx_as_hex", ArgKind::Hex)],
        rule: Rule::StatusOnly,
    },
    OperationSpec {
        operation: Operation::TransactionsStatus,
        name: "transactionsStatus",
        endpoint: Endpoint::Post("/get_transactions_status"),
        args: &[ArgSpec::required(
            "transactionHashes",
            "transactionHashes",
            ArgKind::HashList,
        )],
        rule: Rule::Status(&[
            "transactionsInPool",
            "transactionsInBlock",
            "transactionsUnknown",
        ]),
    },
    OperationSpec {
        operation: Operation::WalletSyncData,
        name: "walletSyncData",
        endpoint: Endpoint::Post("/getwalletsyncdata"),
        args: SYNC_ARGS,
        rule: Rule::Status(&["items", "synced"]),
    },
];
