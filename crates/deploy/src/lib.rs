//! rosemint-deploy - Deployment library for the rosemint NFT system.
//!
//! This crate drives the deployment and post-deployment exercise of the
//! SVG NFT contracts against an Ethereum JSON-RPC endpoint: network
//! detection, local-network mock provisioning, contract deployment,
//! block-explorer verification notices, and minting (including the
//! two-phase randomness-backed flow).

pub mod abi;
pub mod svg;

mod contracts;
pub use contracts::{Artifact, ArtifactStore, ContractSpec, deploy_contract};

mod error;
pub use error::DeployError;

mod funding;
pub use funding::{format_link, fund_with_link, link_balance};

mod mint;
pub use mint::{
    MOCK_RANDOMNESS, MintRequest, ORACLE_RESPONSE_WAIT, RandomnessSignal, extract_mint_request,
    mint_svg, mint_two_phase, randomness_signal, token_uri,
};

mod mocks;
pub use mocks::{
    LINK_TOKEN, MockAddresses, VRF_COORDINATOR_MOCK, VrfParameters, provision_mocks,
    resolve_vrf_parameters,
};

mod network;
pub use network::{LOCAL_CHAIN_ID, NetworkConfig, network_config};

mod rpc;
pub use rpc::{CallRequest, ChainClient, EthClient, LogEntry, RpcError, TransactionReceipt};

mod scripts;
pub use scripts::{RANDOM_SVG_NFT, SVG_NFT, ScriptContext, run_mocks, run_random_svg, run_svg};

mod store;
pub use store::{DeploymentRecord, DeploymentStore};

mod verify;
pub use verify::{announce_verification, verification_command};
