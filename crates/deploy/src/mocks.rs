//! Stand-in contracts for the local network, and VRF parameter
//! resolution.
//!
//! The local network has no LINK token and no randomness oracle, so both
//! get deployed as mocks before anything depends on them. On a persistent
//! network this module only reads addresses from the static table.

use alloy_core::primitives::{Address, B256, U256};
use anyhow::{Context, Result};

use crate::abi::Word;
use crate::contracts::{ArtifactStore, ContractSpec, deploy_contract};
use crate::error::DeployError;
use crate::network::NetworkConfig;
use crate::rpc::ChainClient;
use crate::store::DeploymentStore;

/// Contract name of the LINK token stand-in.
pub const LINK_TOKEN: &str = "LinkToken";
/// Contract name of the VRF coordinator stand-in.
pub const VRF_COORDINATOR_MOCK: &str = "VRFCoordinatorMock";

/// Addresses of the two provisioned stand-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAddresses {
    pub link_token: Address,
    pub vrf_coordinator: Address,
}

/// Deploy the LINK token and VRF coordinator stand-ins.
///
/// Only meaningful on the local network. The token takes no constructor
/// arguments; the coordinator is parameterized by the freshly deployed
/// token's address. Both deployments are persisted so later scripts can
/// resolve them.
pub async fn provision_mocks<C: ChainClient>(
    chain: &C,
    artifacts: &ArtifactStore,
    store: &DeploymentStore,
    deployer: Address,
) -> Result<MockAddresses> {
    tracing::info!("Local network detected, deploying mocks...");

    let mut link = ContractSpec::new(LINK_TOKEN, deployer);
    let link_token = deploy_contract(chain, artifacts, store, &mut link).await?;

    let mut coordinator = ContractSpec::with_args(
        VRF_COORDINATOR_MOCK,
        deployer,
        vec![Word::Address(link_token)],
    );
    let vrf_coordinator = deploy_contract(chain, artifacts, store, &mut coordinator).await?;

    Ok(MockAddresses {
        link_token,
        vrf_coordinator,
    })
}

/// Resolved oracle parameters for the randomness-backed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrfParameters {
    pub link_token: Address,
    pub vrf_coordinator: Address,
    pub key_hash: B256,
    pub fee: U256,
}

/// Resolve the oracle addresses: provisioned mock records on the local
/// network, the static table elsewhere.
pub fn resolve_vrf_parameters(
    config: &NetworkConfig,
    store: &DeploymentStore,
) -> Result<VrfParameters> {
    let (link_token, vrf_coordinator) = if config.is_local() {
        (
            stored_address(store, LINK_TOKEN)?,
            stored_address(store, VRF_COORDINATOR_MOCK)?,
        )
    } else {
        (
            config
                .link_token
                .ok_or(DeployError::Configuration(config.chain_id))?,
            config
                .vrf_coordinator
                .ok_or(DeployError::Configuration(config.chain_id))?,
        )
    };

    Ok(VrfParameters {
        link_token,
        vrf_coordinator,
        key_hash: config.key_hash,
        fee: config.fee,
    })
}

fn stored_address(store: &DeploymentStore, contract_name: &str) -> Result<Address> {
    let record = store.load(contract_name)?.with_context(|| {
        format!("{contract_name} has not been deployed on this network; run the mock deployment first")
    })?;
    Ok(record.address)
}
