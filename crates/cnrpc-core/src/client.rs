use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::catalog::{Endpoint, Operation, WireRequest};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::protocol::unwrap_envelope;
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    Block, BlockHeader, BlockRangeQuery, BlockShortHeader, BlockTemplate, BlocksDetailed,
    BlocksLite, FeeInfo, HeightInfo, NodeInfo, Peers, PoolChanges, PoolTransaction, RandomOutputSet,
    RawBlocks, SyncQuery, TransactionDetail, TransactionIndexes, TransactionsStatus,
    WalletSyncData,
};

/// Requests are never batched, so one id serves every JSON-RPC call.
const REQUEST_ID: u64 = 0;

/// Client for a CryptoNote daemon's HTTP and JSON-RPC endpoints.
///
/// Every operation goes through the same path: the catalog validates the
/// arguments and builds the request, the transport sends it, and the
/// operation's normalizer rule shapes the answer. The typed methods then
/// decode the normalized JSON into [`crate::types`] structs.
///
/// The client holds no mutable state and can be shared between tasks.
pub struct DaemonClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl DaemonClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let config = config.validated()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> DaemonClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `operation` with JSON `args` (an object keyed by argument name, or
    /// `null`) and return its normalized result.
    pub async fn call(&self, operation: Operation, args: Value) -> Result<Value, CoreError> {
        let spec = operation.spec();
        let request = spec.build_request(&args, REQUEST_ID)?;
        debug!(operation = spec.name, endpoint = %spec.endpoint, "daemon call");

        let raw = match request {
            WireRequest::Get { path } => self.transport.get(path).await?,
            WireRequest::Post { path, body } => self.transport.post(path, &body).await?,
        };
        let raw = match spec.endpoint {
            Endpoint::JsonRpc(_) | Endpoint::JsonRpcPositional(_) => unwrap_envelope(raw)?,
            Endpoint::Get(_) | Endpoint::Post(_) => raw,
        };

        spec.rule.apply(raw).map_err(|source| {
            warn!(operation = spec.name, error = %source, "daemon response rejected");
            CoreError::Normalize {
                operation: spec.name,
                status_checked: spec.rule.checks_status(),
                source,
            }
        })
    }

    /// [`call`](Self::call) by caller-facing operation name, e.g. `"blockCount"`.
    pub async fn call_named(&self, name: &str, args: Value) -> Result<Value, CoreError> {
        let operation =
            Operation::from_name(name).ok_or_else(|| CoreError::UnknownOperation(name.to_owned()))?;
        self.call(operation, args).await
    }

    async fn call_typed<R: DeserializeOwned>(
        &self,
        operation: Operation,
        args: Value,
    ) -> Result<R, CoreError> {
        let normalized = self.call(operation, args).await?;
        decode(operation, normalized)
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    pub async fn block(&self, hash: &str) -> Result<Block, CoreError> {
        self.call_typed(Operation::Block, json!({ "hash": hash }))
            .await
    }

    pub async fn block_count(&self) -> Result<u64, CoreError> {
        self.call_typed(Operation::BlockCount, Value::Null).await
    }

    pub async fn block_header_by_hash(&self, hash: &str) -> Result<BlockHeader, CoreError> {
        self.call_typed(Operation::BlockHeaderByHash, json!({ "hash": hash }))
            .await
    }

    pub async fn block_header_by_height(&self, height: u64) -> Result<BlockHeader, CoreError> {
        self.call_typed(Operation::BlockHeaderByHeight, json!({ "height": height }))
            .await
    }

    pub async fn last_block_header(&self) -> Result<BlockHeader, CoreError> {
        self.call_typed(Operation::LastBlockHeader, Value::Null)
            .await
    }

    /// Short headers for the window of blocks ending at `height`.
    pub async fn block_short_headers(
        &self,
        height: u64,
    ) -> Result<Vec<BlockShortHeader>, CoreError> {
        self.call_typed(Operation::BlockShortHeaders, json!({ "height": height }))
            .await
    }

    pub async fn blocks_detailed(
        &self,
        query: &BlockRangeQuery,
    ) -> Result<BlocksDetailed, CoreError> {
        self.call_typed(
            Operation::BlocksDetailed,
            json!({
                "blockHashes": query.block_hashes,
                "timestamp": query.timestamp,
                "blockCount": query.block_count,
            }),
        )
        .await
    }

    pub async fn blocks_lite(
        &self,
        block_hashes: &[String],
        timestamp: u64,
    ) -> Result<BlocksLite, CoreError> {
        self.call_typed(
            Operation::BlocksLite,
            json!({ "blockHashes": block_hashes, "timestamp": timestamp }),
        )
        .await
    }

    pub async fn raw_blocks(&self, query: &SyncQuery) -> Result<RawBlocks, CoreError> {
        self.call_typed(Operation::RawBlocks, sync_args(query))
            .await
    }

    // ==========================================================================
    // Mining
    // ==========================================================================

    pub async fn block_template(
        &self,
        address: &str,
        reserve_size: u64,
    ) -> Result<BlockTemplate, CoreError> {
        self.call_typed(
            Operation::BlockTemplate,
            json!({ "address": address, "reserveSize": reserve_size }),
        )
        .await
    }

    pub async fn submit_block(&self, blob: &str) -> Result<(), CoreError> {
        self.call(Operation::SubmitBlock, json!({ "blob": blob }))
            .await
            .map(drop)
    }

    // ==========================================================================
    // Node
    // ==========================================================================

    pub async fn fee(&self) -> Result<FeeInfo, CoreError> {
        self.call_typed(Operation::Fee, Value::Null).await
    }

    pub async fn height(&self) -> Result<HeightInfo, CoreError> {
        self.call_typed(Operation::Height, Value::Null).await
    }

    pub async fn info(&self) -> Result<NodeInfo, CoreError> {
        self.call_typed(Operation::Info, Value::Null).await
    }

    pub async fn peers(&self) -> Result<Peers, CoreError> {
        self.call_typed(Operation::Peers, Value::Null).await
    }

    // ==========================================================================
    // Transactions & Outputs
    // ==========================================================================

    pub async fn transaction(&self, hash: &str) -> Result<TransactionDetail, CoreError> {
        self.call_typed(Operation::Transaction, json!({ "hash": hash }))
            .await
    }

    pub async fn transaction_pool(&self) -> Result<Vec<PoolTransaction>, CoreError> {
        self.call_typed(Operation::TransactionPool, Value::Null)
            .await
    }

    /// Mempool delta relative to `tail_block_hash` and the transactions the
    /// caller already knows about.
    pub async fn pool_changes(
        &self,
        tail_block_hash: &str,
        known_transaction_hashes: &[String],
    ) -> Result<PoolChanges, CoreError> {
        self.call_typed(
            Operation::PoolChanges,
            json!({
                "tailBlockHash": tail_block_hash,
                "knownTransactionHashes": known_transaction_hashes,
            }),
        )
        .await
    }

    pub async fn transactions_status(
        &self,
        transaction_hashes: &[String],
    ) -> Result<TransactionsStatus, CoreError> {
        self.call_typed(
            Operation::TransactionsStatus,
            json!({ "transactionHashes": transaction_hashes }),
        )
        .await
    }

    pub async fn submit_transaction(&self, transaction_hex: &str) -> Result<(), CoreError> {
        self.call(
            Operation::SubmitTransaction,
            json!({ "transaction": transaction_hex }),
        )
        .await
        .map(drop)
    }

    /// Global output indexes of every output of one transaction.
    pub async fn global_indexes(&self, transaction_hash: &str) -> Result<Vec<u64>, CoreError> {
        self.call_typed(Operation::GlobalIndexes, json!({ "hash": transaction_hash }))
            .await
    }

    pub async fn global_indexes_for_range(
        &self,
        start_height: u64,
        end_height: u64,
    ) -> Result<Vec<TransactionIndexes>, CoreError> {
        self.call_typed(
            Operation::GlobalIndexesForRange,
            json!({ "startHeight": start_height, "endHeight": end_height }),
        )
        .await
    }

    /// Decoy outputs for ring signatures: `mixin` candidates per amount.
    pub async fn random_outputs(
        &self,
        amounts: &[u64],
        mixin: u64,
    ) -> Result<Vec<RandomOutputSet>, CoreError> {
        self.call_typed(
            Operation::RandomOutputs,
            json!({ "amounts": amounts, "mixin": mixin }),
        )
        .await
    }

    pub async fn wallet_sync_data(&self, query: &SyncQuery) -> Result<WalletSyncData, CoreError> {
        self.call_typed(Operation::WalletSyncData, sync_args(query))
            .await
    }
}

fn sync_args(query: &SyncQuery) -> Value {
    json!({
        "blockHashCheckpoints": query.block_hash_checkpoints,
        "startHeight": query.start_height,
        "startTimestamp": query.start_timestamp,
        "blockCount": query.block_count,
        "skipCoinbaseTransactions": query.skip_coinbase_transactions,
    })
}

fn decode<R: DeserializeOwned>(operation: Operation, value: Value) -> Result<R, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Decode {
        operation: operation.name(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{ArgumentError, NetworkError, NormalizeError, RpcError};
    use crate::test_util::*;
    use crate::transport::mock::{MockTransport, RecordedRequest};

    #[tokio::test]
    async fn block_count_unwraps_rpc_result() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc("getblockcount", json!({"jsonrpc": "2.0", "result": {"count": 12345}}))
                .build(),
        );
        assert_eq!(client.block_count().await.expect("should succeed"), 12345);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let RecordedRequest::Post { path, body } = &requests[0] else {
            panic!("blockCount must POST");
        };
        assert_eq!(path, "/json_rpc");
        assert_eq!(body["jsonrpc"], json!("2.0"));
        assert_eq!(body["method"], json!("getblockcount"));
    }

    #[tokio::test]
    async fn global_indexes_are_status_checked() {
        let client = client_with(
            MockTransport::builder()
                .with_route("/get_o_indexes", json!({"status": "OK", "o_indexes": [1, 2, 3]}))
                .build(),
        );
        assert_eq!(
            client.global_indexes(HASH_A).await.expect("should succeed"),
            vec![1, 2, 3]
        );
        assert_eq!(
            client.transport().requests()[0],
            RecordedRequest::Post {
                path: "/get_o_indexes".into(),
                body: json!({"txid": HASH_A})
            }
        );

        let client = client_with(
            MockTransport::builder()
                .with_route("/get_o_indexes", json!({"status": "failed"}))
                .build(),
        );
        let err = client.global_indexes(HASH_A).await.expect_err("must fail");
        assert!(err.is_status_error());
        assert!(matches!(
            err,
            CoreError::Normalize {
                operation: "globalIndexes",
                status_checked: true,
                source: NormalizeError::StatusNotOk { .. }
            }
        ));
    }

    #[tokio::test]
    async fn missing_field_of_unchecked_result_is_not_a_status_error() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc("getblockcount", json!({"jsonrpc": "2.0", "result": {"height": 5}}))
                .build(),
        );
        let err = client.block_count().await.expect_err("must fail");
        assert!(!err.is_status_error());
        assert!(matches!(
            err,
            CoreError::Normalize {
                operation: "blockCount",
                status_checked: false,
                source: NormalizeError::MissingKey { .. }
            }
        ));
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_transport() {
        let client = client_with(MockTransport::builder().build());

        let err = client
            .call_named("blocksDetailed", json!({"blockHashes": HASH_A}))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Argument(ArgumentError::NotAnArray("blockHashes"))
        ));

        let err = client
            .call_named("randomOutputs", json!({"amounts": [1], "mixin": "many"}))
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Argument(ArgumentError::NotNumeric { .. })));

        let err = client.block("not-a-hash").await.expect_err("must fail");
        assert!(matches!(err, CoreError::Argument(ArgumentError::InvalidHash { .. })));

        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn unknown_operation_name_is_rejected() {
        let client = client_with(MockTransport::builder().build());
        let err = client
            .call_named("getblockcount", Value::Null)
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoreError::UnknownOperation(name) if name == "getblockcount"));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn rpc_errors_carry_the_daemon_message() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc(
                    "getblockheaderbyheight",
                    json!({"jsonrpc": "2.0", "error": {"code": -2, "message": "Too big height"}}),
                )
                .build(),
        );
        let err = client
            .block_header_by_height(99_999_999)
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::ServerError { code: -2, ref message }) if message == "Too big height"
        ));
    }

    #[tokio::test]
    async fn network_failures_propagate_unchanged() {
        let client = client_with(MockTransport::builder().with_timeout("/height").build());
        let err = client.height().await.expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Network(NetworkError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn block_headers_decode() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc_result(
                    "getblockheaderbyhash",
                    json!({"block_header": block_header_json(500), "status": "OK"}),
                )
                .with_rpc_result(
                    "getlastblockheader",
                    json!({"block_header": block_header_json(900), "status": "OK"}),
                )
                .build(),
        );
        let header = client
            .block_header_by_hash(HASH_A)
            .await
            .expect("should succeed");
        assert_eq!(header.height, 500);
        assert_eq!(header.prev_hash, HASH_B);

        let last = client.last_block_header().await.expect("should succeed");
        assert_eq!(last.height, 900);
    }

    #[tokio::test]
    async fn decode_errors_name_the_field() {
        let client = client_with(
            MockTransport::builder()
                .with_route("/height", json!({"status": "OK", "height": "tall", "network_height": 1}))
                .build(),
        );
        let err = client.height().await.expect_err("must fail");
        match err {
            CoreError::Decode { operation, message } => {
                assert_eq!(operation, "height");
                assert!(message.contains("invalid type"), "{message}");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fee_and_peers_return_documented_keys_only() {
        let client = client_with(
            MockTransport::builder()
                .with_route(
                    "/fee",
                    json!({"address": "TRTLv1", "amount": 5000, "status": "Ok"}),
                )
                .with_route(
                    "/peers",
                    json!({"peers": ["1.2.3.4:11897"], "gray_peers": [], "status": "OK"}),
                )
                .build(),
        );
        let fee = client.call(Operation::Fee, Value::Null).await.expect("should succeed");
        assert_eq!(fee, json!({"address": "TRTLv1", "amount": 5000}));

        let peers = client.peers().await.expect("should succeed");
        assert_eq!(peers.peers, vec!["1.2.3.4:11897".to_owned()]);
        assert!(peers.gray_peers.is_empty());
    }

    #[tokio::test]
    async fn info_is_decoded_without_status() {
        let client = client_with(
            MockTransport::builder()
                .with_route("/info", node_info_response())
                .build(),
        );
        let info = client.info().await.expect("should succeed");
        assert_eq!(info.height, 3_000_001);
        assert!(info.synced);
        assert_eq!(info.upgrade_heights.len(), 3);
    }

    #[tokio::test]
    async fn blocks_lite_end_to_end() {
        let client = client_with(
            MockTransport::builder()
                .with_route("/queryblockslite", blocks_lite_response())
                .build(),
        );
        let lite = client
            .blocks_lite(&[HASH_A.to_owned()], 0)
            .await
            .expect("should succeed");
        assert_eq!(lite.current_height, 1001);
        assert_eq!(lite.items.len(), 2);
        assert_eq!(lite.items[0].block, "0100ff");
        assert_eq!(lite.items[0].hash, HASH_A);
        assert_eq!(lite.items[0].transactions[0].hash, HASH_B);
        assert_eq!(lite.items[1].block, "10");
        assert!(lite.items[1].transactions.is_empty());

        assert_eq!(
            client.transport().requests()[0],
            RecordedRequest::Post {
                path: "/queryblockslite".into(),
                body: json!({"blockIds": [HASH_A], "timestamp": 0})
            }
        );
    }

    #[tokio::test]
    async fn transaction_drops_empty_key() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc_result(
                    "f_transaction_json",
                    json!({
                        "block": {"hash": HASH_B, "height": 10},
                        "tx": {"": "", "version": 1, "extra": "01ab"},
                        "txDetails": {"hash": HASH_A, "fee": 10},
                        "status": "OK"
                    }),
                )
                .build(),
        );
        let detail = client.transaction(HASH_A).await.expect("should succeed");
        assert!(!detail.tx.contains_key(""));
        assert_eq!(detail.tx.get("version"), Some(&json!(1)));
        assert_eq!(detail.tx_details.get("fee"), Some(&json!(10)));
    }

    #[tokio::test]
    async fn pool_changes_and_status_lists() {
        let client = client_with(
            MockTransport::builder()
                .with_route(
                    "/get_pool_changes_lite",
                    json!({
                        "addedTxs": [{
                            "transactionPrefixInfo.txHash": HASH_B,
                            "transactionPrefixInfo.txPrefix": {"version": 1}
                        }],
                        "deletedTxsIds": [HASH_A],
                        "isTailBlockActual": false,
                        "status": "OK"
                    }),
                )
                .with_route(
                    "/get_transactions_status",
                    json!({
                        "transactionsInPool": [HASH_A],
                        "transactionsInBlock": [],
                        "transactionsUnknown": [HASH_B],
                        "status": "OK"
                    }),
                )
                .build(),
        );
        let changes = client
            .pool_changes(HASH_A, &[HASH_A.to_owned()])
            .await
            .expect("should succeed");
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].hash, HASH_B);
        assert_eq!(changes.deleted, vec![HASH_A.to_owned()]);
        assert!(!changes.tail_block_current);

        let status = client
            .transactions_status(&[HASH_A.to_owned(), HASH_B.to_owned()])
            .await
            .expect("should succeed");
        assert_eq!(status.in_pool, vec![HASH_A.to_owned()]);
        assert_eq!(status.unknown, vec![HASH_B.to_owned()]);

        let RecordedRequest::Post { body, .. } = &client.transport().requests()[0] else {
            panic!("poolChanges must POST");
        };
        assert_eq!(body, &json!({"tailBlockId": HASH_A, "knownTxsIds": [HASH_A]}));
    }

    #[tokio::test]
    async fn random_outputs_send_mixin_as_outs_count() {
        let client = client_with(
            MockTransport::builder()
                .with_route(
                    "/getrandom_outs",
                    json!({
                        "outs": [{
                            "amount": 100,
                            "outs": [
                                {"global_amount_index": 7, "out_key": "k7"},
                                {"global_amount_index": 9, "out_key": "k9"}
                            ]
                        }],
                        "status": "OK"
                    }),
                )
                .build(),
        );
        let sets = client
            .random_outputs(&[100], 2)
            .await
            .expect("should succeed");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].outs[1].index, 9);

        let RecordedRequest::Post { body, .. } = &client.transport().requests()[0] else {
            panic!("randomOutputs must POST");
        };
        assert_eq!(body, &json!({"amounts": [100], "outs_count": 2}));
    }

    #[tokio::test]
    async fn submissions_check_status() {
        let client = client_with(
            MockTransport::builder()
                .with_route("/sendrawtransaction", json!({"status": "OK"}))
                .with_rpc_result("submitblock", json!({"status": "Block not accepted"}))
                .build(),
        );
        client
            .submit_transaction("01AB")
            .await
            .expect("should succeed");

        let err = client.submit_block("0100").await.expect_err("must fail");
        assert!(err.is_status_error());

        let requests = client.transport().requests();
        assert_eq!(
            requests[0],
            RecordedRequest::Post {
                path: "/sendrawtransaction".into(),
                body: json!({"tx_as_hex": "01ab"})
            }
        );
        let RecordedRequest::Post { body, .. } = &requests[1] else {
            panic!("submitBlock must POST");
        };
        assert_eq!(body["params"], json!(["0100"]));
    }

    #[tokio::test]
    async fn block_template_keeps_reserved_offset() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc_result(
                    "getblocktemplate",
                    json!({
                        "blocktemplate_blob": "0707",
                        "difficulty": 250_000,
                        "height": 3_000_002,
                        "reserved_offset": 412,
                        "status": "OK"
                    }),
                )
                .build(),
        );
        let template = client
            .block_template("TRTLv1", 8)
            .await
            .expect("should succeed");
        assert_eq!(template.blob, "0707");
        assert_eq!(template.reserved_offset, 412);

        let RecordedRequest::Post { body, .. } = &client.transport().requests()[0] else {
            panic!("blockTemplate must POST");
        };
        assert_eq!(
            body["params"],
            json!({"wallet_address": "TRTLv1", "reserve_size": 8})
        );
    }

    #[tokio::test]
    async fn wallet_sync_sends_full_cursor() {
        let client = client_with(
            MockTransport::builder()
                .with_route(
                    "/getwalletsyncdata",
                    json!({
                        "items": [{
                            "blockHash": HASH_A,
                            "blockHeight": 10,
                            "blockTimestamp": 1_600_000_000u64,
                            "coinbaseTX": {"hash": HASH_B, "outputs": []},
                            "transactions": []
                        }],
                        "synced": true,
                        "status": "OK"
                    }),
                )
                .build(),
        );
        let query = SyncQuery::from_checkpoints(vec![HASH_B.to_owned()])
            .with_block_count(250)
            .skip_coinbase(true);
        let data = client
            .wallet_sync_data(&query)
            .await
            .expect("should succeed");
        assert!(data.synced);
        assert_eq!(data.items[0].block_height, 10);
        assert!(data.items[0].coinbase_tx.is_some());

        let RecordedRequest::Post { body, .. } = &client.transport().requests()[0] else {
            panic!("walletSyncData must POST");
        };
        assert_eq!(
            body,
            &json!({
                "blockHashCheckpoints": [HASH_B],
                "startHeight": 0,
                "startTimestamp": 0,
                "blockCount": 100,
                "skipCoinbaseTransactions": true
            })
        );
    }

    #[tokio::test]
    async fn range_operations_decode() {
        let client = client_with(
            MockTransport::builder()
                .with_route(
                    "/get_global_indexes_for_range",
                    json!({"indexes": [{"key": HASH_A, "value": [0, 1]}], "status": "OK"}),
                )
                .with_route(
                    "/queryblocksdetailed",
                    json!({"blocks": [{"hash": HASH_A}], "currentHeight": 5, "fullOffset": 4, "status": "OK"}),
                )
                .with_route(
                    "/getrawblocks",
                    json!({"items": [{"block": "0101", "transactions": ["02"]}], "synced": false, "status": "OK"}),
                )
                .build(),
        );
        let ranges = client
            .global_indexes_for_range(0, 10)
            .await
            .expect("should succeed");
        assert_eq!(ranges[0].hash, HASH_A);
        assert_eq!(ranges[0].indexes, vec![0, 1]);

        let detailed = client
            .blocks_detailed(&BlockRangeQuery::new(vec![HASH_A.to_owned()]).with_block_count(10))
            .await
            .expect("should succeed");
        assert_eq!(detailed.blocks.len(), 1);
        assert_eq!(detailed.full_offset, 4);

        let raw = client
            .raw_blocks(&SyncQuery::from_height(3))
            .await
            .expect("should succeed");
        assert_eq!(raw.items[0].transactions, vec!["02".to_owned()]);
        assert!(!raw.synced);
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_client() {
        let client = client_with(
            MockTransport::builder()
                .with_rpc_result("getblockcount", json!({"count": 7}))
                .with_route("/height", json!({"height": 6, "network_height": 7, "status": "OK"}))
                .build(),
        );
        let (count, height) = tokio::join!(client.block_count(), client.height());
        assert_eq!(count.expect("should succeed"), 7);
        assert!(!height.expect("should succeed").is_synced());
        assert_eq!(client.transport().request_count(), 2);
    }

    #[test]
    fn client_builds_over_http() {
        let client = DaemonClient::new(ClientConfig::default()).expect("should build");
        assert_eq!(client.transport().base_url(), "http://127.0.0.1:11898");
        assert!(DaemonClient::new(ClientConfig::default().with_port(0)).is_err());
    }
}
