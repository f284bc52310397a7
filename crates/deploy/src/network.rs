//! Static network parameter table.

use alloy_core::primitives::{Address, B256, U256, address, b256};

use crate::error::DeployError;

/// Chain id of the disposable local development network.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Key hash identifying the VRF job, shared by every supported network.
const KEY_HASH: B256 = b256!("2ed0feb3e7fd2022120aa84fab1945545a9f2ffc9076fd6156fa96eaff4c1311");

/// Oracle fee per randomness request: 0.1 LINK in base units.
const FEE: u128 = 100_000_000_000_000_000;

/// Oracle parameters and addresses for one supported network.
///
/// Immutable once resolved; the local-vs-remote decision every later step
/// needs is exposed through [`NetworkConfig::is_local`] rather than
/// repeated chain-id comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: &'static str,
    /// LINK token address; `None` on the local network, where a mock is
    /// deployed instead.
    pub link_token: Option<Address>,
    /// VRF coordinator address; `None` on the local network.
    pub vrf_coordinator: Option<Address>,
    pub key_hash: B256,
    /// Oracle fee in LINK base units.
    pub fee: U256,
}

impl NetworkConfig {
    /// Whether this is the disposable local network (mocks required, no
    /// block explorer).
    pub fn is_local(&self) -> bool {
        self.chain_id == LOCAL_CHAIN_ID
    }
}

/// Resolve the parameters for a chain id from the static table.
pub fn network_config(chain_id: u64) -> Result<NetworkConfig, DeployError> {
    match chain_id {
        LOCAL_CHAIN_ID => Ok(NetworkConfig {
            chain_id,
            name: "localhost",
            link_token: None,
            vrf_coordinator: None,
            key_hash: KEY_HASH,
            fee: U256::from(FEE),
        }),
        4 => Ok(NetworkConfig {
            chain_id,
            name: "rinkeby",
            link_token: Some(address!("01BE23585060835E02B77ef475b0Cc51aA1e0709")),
            vrf_coordinator: Some(address!("b3dCcb4Cf7a26f6cf6B120Cf5A73875B7BBc655B")),
            key_hash: KEY_HASH,
            fee: U256::from(FEE),
        }),
        other => Err(DeployError::Configuration(other)),
    }
}
