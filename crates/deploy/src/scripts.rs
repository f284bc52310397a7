//! The deploy scripts: sequential orchestration of network resolution,
//! mock provisioning, deployment, verification notices, and minting.

use alloy_core::primitives::{Address, U256};
use anyhow::Result;

use crate::abi::Word;
use crate::contracts::{ArtifactStore, ContractSpec, deploy_contract};
use crate::funding::fund_with_link;
use crate::mint::{mint_svg, mint_two_phase, randomness_signal};
use crate::mocks::{MockAddresses, provision_mocks, resolve_vrf_parameters};
use crate::network::NetworkConfig;
use crate::rpc::ChainClient;
use crate::store::DeploymentStore;
use crate::verify::announce_verification;

/// Contract name of the plain SVG collection.
pub const SVG_NFT: &str = "SVGNFT";
/// Contract name of the randomness-backed collection.
pub const RANDOM_SVG_NFT: &str = "RandomSVGNFT";

/// Everything the scripts need to run against one network.
pub struct ScriptContext<'a, C> {
    pub chain: &'a C,
    pub config: &'a NetworkConfig,
    pub artifacts: &'a ArtifactStore,
    pub store: &'a DeploymentStore,
    /// Account that signs every transaction.
    pub deployer: Address,
}

/// Deploy the local-network stand-ins. No-op off the local network;
/// callers must not depend on its output there.
pub async fn run_mocks<C: ChainClient>(
    ctx: &ScriptContext<'_, C>,
) -> Result<Option<MockAddresses>> {
    if !ctx.config.is_local() {
        tracing::info!("Persistent network detected, no mocks needed");
        return Ok(None);
    }

    let mocks = provision_mocks(ctx.chain, ctx.artifacts, ctx.store, ctx.deployer).await?;
    Ok(Some(mocks))
}

/// Deploy the plain SVG collection and mint the given images onto it.
///
/// Returns the metadata URI of every minted token.
pub async fn run_svg<C: ChainClient>(
    ctx: &ScriptContext<'_, C>,
    svgs: &[String],
) -> Result<Vec<String>> {
    let mut contract = ContractSpec::new(SVG_NFT, ctx.deployer);
    deploy_contract(ctx.chain, ctx.artifacts, ctx.store, &mut contract).await?;
    announce_verification(ctx.config, &contract)?;

    let mut uris = Vec::with_capacity(svgs.len());
    for (token_id, svg) in svgs.iter().enumerate() {
        let uri = mint_svg(
            ctx.chain,
            &contract,
            svg,
            U256::from(token_id),
            ctx.deployer,
        )
        .await?;
        uris.push(uri);
    }
    Ok(uris)
}

/// Deploy the randomness-backed collection and run `mints` funded
/// two-phase mints against it.
///
/// Returns the metadata URI of every minted token.
pub async fn run_random_svg<C: ChainClient>(
    ctx: &ScriptContext<'_, C>,
    mints: usize,
) -> Result<Vec<String>> {
    let params = resolve_vrf_parameters(ctx.config, ctx.store)?;

    let mut contract = ContractSpec::with_args(
        RANDOM_SVG_NFT,
        ctx.deployer,
        vec![
            Word::Address(params.vrf_coordinator),
            Word::Address(params.link_token),
            Word::Bytes32(params.key_hash),
            Word::Uint(params.fee),
        ],
    );
    let address = deploy_contract(ctx.chain, ctx.artifacts, ctx.store, &mut contract).await?;
    announce_verification(ctx.config, &contract)?;

    let signal = randomness_signal(ctx.config, params.vrf_coordinator);
    let mut uris = Vec::with_capacity(mints);
    for _ in 0..mints {
        // Each mint pays the oracle fee in LINK before requesting.
        fund_with_link(
            ctx.chain,
            params.link_token,
            params.fee,
            address,
            ctx.deployer,
        )
        .await?;

        let uri = mint_two_phase(ctx.chain, &contract, signal, ctx.deployer).await?;
        uris.push(uri);
    }
    Ok(uris)
}
