//! JSON-RPC plumbing for talking to an Ethereum node.
//!
//! Transactions are signed by the node's own managed accounts
//! (`eth_sendTransaction`), which is all a development deployment needs.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes, U64};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

/// Timeout for a single RPC request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Maximum time to wait for a transaction to be mined.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from the JSON-RPC transport and the node behind it.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned error: {0}")]
    Node(String),

    #[error("failed to decode {method} result: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("timed out after {0:?} waiting for transaction {1} to be mined")]
    ReceiptTimeout(Duration, B256),
}

/// A transaction to be signed and broadcast by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    /// `None` creates a new contract.
    pub to: Option<Address>,
    pub data: Bytes,
    /// Explicit gas limit; the node estimates when absent.
    pub gas: Option<u64>,
}

/// One emitted event log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The fields of a transaction receipt the deploy scripts consume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    /// Present once the transaction is mined.
    pub block_number: Option<U64>,
    /// Present for create transactions.
    pub contract_address: Option<Address>,
    /// `0x1` on success; pre-Byzantium nodes omit it.
    pub status: Option<U64>,
    pub logs: Vec<LogEntry>,
}

impl TransactionReceipt {
    /// Whether the transaction executed without reverting.
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

/// The chain surface the deployment flows need.
///
/// [`EthClient`] implements it over JSON-RPC; tests substitute a scripted
/// fake so the flows can run without a node.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Submit a transaction for the node to sign and broadcast.
    async fn send_transaction(&self, request: &CallRequest) -> Result<B256, RpcError>;

    /// Wait until the transaction is mined and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, RpcError>;

    /// Execute a read-only contract call against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError>;
}

/// HTTP JSON-RPC client for a single endpoint.
#[derive(Debug, Clone)]
pub struct EthClient {
    http: reqwest::Client,
    url: String,
}

impl EthClient {
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, RpcError> {
        let response: Value = self
            .http
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown");
            return Err(RpcError::Node(format!("{method}: {message}")));
        }

        let result = response.get("result").cloned().unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|source| RpcError::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// The chain id the node reports via `eth_chainId`.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U64 = self.request("eth_chainId", vec![]).await?;
        Ok(id.to::<u64>())
    }

    /// The accounts the node manages; index 0 is the default deployer.
    pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.request("eth_accounts", vec![]).await
    }

    async fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", vec![json!(tx_hash)])
            .await
    }
}

/// Build the `eth_sendTransaction` parameter object for a request.
fn transaction_params(request: &CallRequest) -> Value {
    let mut tx = json!({
        "from": request.from,
        "data": request.data,
    });
    if let Some(to) = request.to {
        tx["to"] = json!(to);
    }
    if let Some(gas) = request.gas {
        tx["gas"] = json!(format!("0x{gas:x}"));
    }
    tx
}

impl ChainClient for EthClient {
    async fn send_transaction(&self, request: &CallRequest) -> Result<B256, RpcError> {
        self.request("eth_sendTransaction", vec![transaction_params(request)])
            .await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, RpcError> {
        let start = std::time::Instant::now();
        loop {
            if let Some(receipt) = self.transaction_receipt(tx_hash).await?
                && receipt.block_number.is_some()
            {
                return Ok(receipt);
            }

            if start.elapsed() > RECEIPT_TIMEOUT {
                return Err(RpcError::ReceiptTimeout(RECEIPT_TIMEOUT, tx_hash));
            }

            tracing::trace!(tx_hash = %tx_hash, "Transaction not mined yet, polling...");
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        self.request(
            "eth_call",
            vec![json!({"to": to, "data": data}), json!("latest")],
        )
        .await
    }
}
