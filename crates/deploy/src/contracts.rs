//! Contract artifacts and the deployment transaction.

use std::path::PathBuf;

use alloy_core::primitives::{Address, Bytes};
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::abi::{self, Word};
use crate::error::DeployError;
use crate::rpc::{CallRequest, ChainClient};
use crate::store::{DeploymentRecord, DeploymentStore};

/// A compiled contract artifact (one JSON file per contract, as emitted
/// by the solidity build tooling). Compilation itself happens outside
/// this crate; only the creation bytecode is consumed here.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Creation bytecode, 0x-prefixed.
    pub bytecode: Bytes,
}

/// Loads artifacts from a directory of `<Name>.json` files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the artifact for a contract by name.
    pub fn load(&self, name: &str) -> Result<Artifact> {
        let path = self.dir.join(format!("{name}.json"));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        let artifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;
        Ok(artifact)
    }
}

/// Parameters and, once deployed, the address of one contract instance.
///
/// The address is recorded exactly once and must be present before any
/// dependent call (verification, minting) consumes the spec.
#[derive(Debug, Clone)]
pub struct ContractSpec {
    pub name: String,
    pub deployer: Address,
    pub constructor_args: Vec<Word>,
    address: Option<Address>,
}

impl ContractSpec {
    pub fn new(name: impl Into<String>, deployer: Address) -> Self {
        Self::with_args(name, deployer, vec![])
    }

    pub fn with_args(name: impl Into<String>, deployer: Address, args: Vec<Word>) -> Self {
        Self {
            name: name.into(),
            deployer,
            constructor_args: args,
            address: None,
        }
    }

    /// The deployed address; errors until [`ContractSpec::record_address`]
    /// has run.
    pub fn address(&self) -> Result<Address, DeployError> {
        self.address.ok_or_else(|| DeployError::Deployment {
            name: self.name.clone(),
            reason: "contract address not yet recorded".to_string(),
        })
    }

    /// Record the deployed address. Recording twice is an error.
    pub fn record_address(&mut self, address: Address) -> Result<(), DeployError> {
        if self.address.is_some() {
            return Err(DeployError::Deployment {
                name: self.name.clone(),
                reason: "contract address recorded twice".to_string(),
            });
        }
        self.address = Some(address);
        Ok(())
    }
}

/// Deploy a contract, record its address on the spec, and persist the
/// deployment record.
///
/// Sends one create transaction (bytecode plus ABI-encoded constructor
/// arguments) and waits for it to be mined. A reverted constructor or a
/// receipt without a contract address aborts with
/// [`DeployError::Deployment`]; nothing is retried.
pub async fn deploy_contract<C: ChainClient>(
    chain: &C,
    artifacts: &ArtifactStore,
    store: &DeploymentStore,
    spec: &mut ContractSpec,
) -> Result<Address> {
    let artifact = artifacts.load(&spec.name)?;

    let mut data = artifact.bytecode.to_vec();
    data.extend_from_slice(&abi::encode_words(&spec.constructor_args));

    let tx_hash = chain
        .send_transaction(&CallRequest {
            from: spec.deployer,
            to: None,
            data: Bytes::from(data),
            gas: None,
        })
        .await
        .with_context(|| format!("Failed to send create transaction for {}", spec.name))?;

    let receipt = chain.wait_for_receipt(tx_hash).await?;
    if !receipt.succeeded() {
        return Err(DeployError::Deployment {
            name: spec.name.clone(),
            reason: format!("create transaction {tx_hash} reverted"),
        }
        .into());
    }

    let address = receipt.contract_address.ok_or_else(|| DeployError::Deployment {
        name: spec.name.clone(),
        reason: "receipt carried no contract address".to_string(),
    })?;
    spec.record_address(address)?;

    store.save(&DeploymentRecord {
        contract_name: spec.name.clone(),
        address,
        constructor_args: spec.constructor_args.iter().map(Word::to_string).collect(),
        transaction_hash: tx_hash,
    })?;

    tracing::info!(contract = %spec.name, address = %address, "Contract deployed");
    Ok(address)
}
