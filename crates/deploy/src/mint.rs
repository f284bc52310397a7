//! Post-deployment minting, including the two-phase randomness flow.
//!
//! The two-phase mint walks Idle -> Requested -> RandomnessReceived ->
//! Finished. A failure at any step aborts the sequence: minting is not
//! idempotent, and a failed finish leaves the token in its requested
//! state on-chain.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, U256};
use anyhow::{Context, Result};

use crate::abi::{self, Word};
use crate::contracts::ContractSpec;
use crate::error::DeployError;
use crate::network::NetworkConfig;
use crate::rpc::{CallRequest, ChainClient, TransactionReceipt};

/// Gas limit for `startMint`.
const START_MINT_GAS: u64 = 300_000;
/// Gas limit for `finishMint`.
const FINISH_MINT_GAS: u64 = 2_000_000;
/// Randomness value delivered through the mock coordinator.
pub const MOCK_RANDOMNESS: u64 = 77_777;
/// How long to wait for the real oracle network to respond on a
/// persistent network. Best-effort: a slower or faster oracle response is
/// not detected.
pub const ORACLE_RESPONSE_WAIT: Duration = Duration::from_secs(180);

/// Position of the randomness-request log in the `startMint` receipt.
///
/// Precondition on the target contract: `startMint` emits the request
/// event fourth, carrying the request id as topic 1 and the token id as
/// topic 2. Tied to the contract's exact emission order; a contract that
/// emits differently fails here with a protocol error.
const REQUEST_LOG_INDEX: usize = 3;
const REQUEST_ID_TOPIC: usize = 1;
const TOKEN_ID_TOPIC: usize = 2;

/// A mint in flight through the two-phase flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// The `startMint` transaction that opened the request.
    pub request_tx: B256,
    /// Correlation key for the oracle callback.
    pub request_id: B256,
    pub token_id: U256,
    pub randomness_fulfilled: bool,
}

/// How the randomness for a requested mint will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomnessSignal {
    /// Drive the mock coordinator's callback directly (local network).
    MockCallback { coordinator: Address },
    /// Block for a fixed duration while the real oracle responds
    /// off-chain.
    FixedWait(Duration),
}

/// Decide how randomness will be observed on this network.
pub fn randomness_signal(config: &NetworkConfig, coordinator: Address) -> RandomnessSignal {
    if config.is_local() {
        RandomnessSignal::MockCallback { coordinator }
    } else {
        RandomnessSignal::FixedWait(ORACLE_RESPONSE_WAIT)
    }
}

/// Pull the request id and token id out of the `startMint` receipt.
pub fn extract_mint_request(receipt: &TransactionReceipt) -> Result<MintRequest, DeployError> {
    let log = receipt.logs.get(REQUEST_LOG_INDEX).ok_or_else(|| {
        DeployError::Protocol(format!(
            "startMint receipt has {} logs, expected the request event at index {REQUEST_LOG_INDEX}",
            receipt.logs.len()
        ))
    })?;

    let request_id = log
        .topics
        .get(REQUEST_ID_TOPIC)
        .copied()
        .ok_or_else(|| DeployError::Protocol("request event is missing the request id topic".to_string()))?;
    let token_id = log
        .topics
        .get(TOKEN_ID_TOPIC)
        .copied()
        .ok_or_else(|| DeployError::Protocol("request event is missing the token id topic".to_string()))?;

    Ok(MintRequest {
        request_tx: receipt.transaction_hash,
        request_id,
        token_id: U256::from_be_bytes(token_id.0),
        randomness_fulfilled: false,
    })
}

/// Run one full two-phase mint against a deployed contract and return
/// the minted token's metadata URI.
pub async fn mint_two_phase<C: ChainClient>(
    chain: &C,
    contract: &ContractSpec,
    signal: RandomnessSignal,
    from: Address,
) -> Result<String> {
    let contract_address = contract.address()?;

    // Idle -> Requested
    let tx_hash = chain
        .send_transaction(&CallRequest {
            from,
            to: Some(contract_address),
            data: abi::encode_call("startMint()", &[]),
            gas: Some(START_MINT_GAS),
        })
        .await
        .context("Failed to send startMint")?;
    let receipt = chain.wait_for_receipt(tx_hash).await?;
    if !receipt.succeeded() {
        anyhow::bail!("startMint transaction {tx_hash} reverted");
    }

    let mut request = extract_mint_request(&receipt)?;
    tracing::info!(
        contract = %contract.name,
        token_id = %request.token_id,
        "Mint requested"
    );

    // Requested -> RandomnessReceived
    tracing::info!("Waiting for the randomness oracle to respond...");
    match signal {
        RandomnessSignal::MockCallback { coordinator } => {
            let data = abi::encode_call(
                "callBackWithRandomness(bytes32,uint256,address)",
                &[
                    Word::Bytes32(request.request_id),
                    Word::Uint(U256::from(MOCK_RANDOMNESS)),
                    Word::Address(contract_address),
                ],
            );
            let tx_hash = chain
                .send_transaction(&CallRequest {
                    from,
                    to: Some(coordinator),
                    data,
                    gas: None,
                })
                .await
                .context("Failed to send mock randomness callback")?;
            let receipt = chain.wait_for_receipt(tx_hash).await?;
            if !receipt.succeeded() {
                anyhow::bail!("mock randomness callback for token {} reverted", request.token_id);
            }
        }
        RandomnessSignal::FixedWait(wait) => {
            tokio::time::sleep(wait).await;
        }
    }
    request.randomness_fulfilled = true;
    tracing::info!(token_id = %request.token_id, "Random number received");

    // RandomnessReceived -> Finished
    let tx_hash = chain
        .send_transaction(&CallRequest {
            from,
            to: Some(contract_address),
            data: abi::encode_call("finishMint(uint256)", &[Word::Uint(request.token_id)]),
            gas: Some(FINISH_MINT_GAS),
        })
        .await
        .context("Failed to send finishMint")?;
    let receipt = chain.wait_for_receipt(tx_hash).await?;
    if !receipt.succeeded() {
        anyhow::bail!(
            "finishMint reverted; token {} is left in its requested state on-chain",
            request.token_id
        );
    }

    let uri = token_uri(chain, contract_address, request.token_id).await?;
    tracing::info!(
        contract = %contract.name,
        token_id = %request.token_id,
        token_uri = %uri,
        "Mint finished"
    );
    Ok(uri)
}

/// Mint a pre-rendered SVG on the plain collection and return the new
/// token's metadata URI. Token ids are assigned by the contract counter,
/// sequentially from 0; the caller tracks the expected id.
pub async fn mint_svg<C: ChainClient>(
    chain: &C,
    contract: &ContractSpec,
    svg: &str,
    token_id: U256,
    from: Address,
) -> Result<String> {
    let contract_address = contract.address()?;

    let tx_hash = chain
        .send_transaction(&CallRequest {
            from,
            to: Some(contract_address),
            data: abi::encode_string_call("mint(string)", svg),
            gas: None,
        })
        .await
        .context("Failed to send mint")?;
    let receipt = chain.wait_for_receipt(tx_hash).await?;
    if !receipt.succeeded() {
        anyhow::bail!("mint of token {token_id} reverted");
    }

    let uri = token_uri(chain, contract_address, token_id).await?;
    tracing::info!(
        contract = %contract.name,
        token_id = %token_id,
        token_uri = %uri,
        "SVG minted"
    );
    Ok(uri)
}

/// Read a token's metadata URI.
pub async fn token_uri<C: ChainClient>(
    chain: &C,
    contract: Address,
    token_id: U256,
) -> Result<String> {
    let output = chain
        .call(contract, abi::encode_call("tokenURI(uint256)", &[Word::Uint(token_id)]))
        .await
        .context("Failed to query tokenURI")?;
    abi::decode_string_return(&output).ok_or_else(|| {
        DeployError::Protocol("tokenURI did not return a decodable string".to_string()).into()
    })
}
