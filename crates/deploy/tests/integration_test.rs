//! Integration tests for the deploy scripts, run against a scripted
//! in-memory chain (see `common`).

mod common;

use alloy_core::primitives::{Address, U256, address};
use common::{FakeChain, selector};
use rosemint_deploy::{
    ArtifactStore, DeploymentStore, MOCK_RANDOMNESS, NetworkConfig, ScriptContext, fund_with_link,
    network_config, run_mocks, run_random_svg, run_svg,
};
use tempdir::TempDir;

const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Shared per-test setup: artifact files on disk, an empty deployment
/// store, and the scripted chain.
struct TestContext {
    chain: FakeChain,
    config: NetworkConfig,
    artifacts_dir: TempDir,
    deployments_dir: TempDir,
}

impl TestContext {
    fn new(chain_id: u64, contracts: &[&str]) -> Self {
        let artifacts_dir = TempDir::new("rosemint-artifacts").unwrap();
        for (index, name) in contracts.iter().enumerate() {
            std::fs::write(
                artifacts_dir.path().join(format!("{name}.json")),
                // Distinct placeholder bytecode per contract
                format!(
                    r#"{{"contractName": "{name}", "abi": [], "bytecode": "0x60806040{index:02x}"}}"#
                ),
            )
            .unwrap();
        }

        Self {
            chain: FakeChain::new(),
            config: network_config(chain_id).unwrap(),
            artifacts_dir,
            deployments_dir: TempDir::new("rosemint-deployments").unwrap(),
        }
    }

    fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.artifacts_dir.path())
    }

    fn store(&self) -> DeploymentStore {
        DeploymentStore::new(self.deployments_dir.path(), self.config.name)
    }
}

macro_rules! script_ctx {
    ($test:expr, $artifacts:expr, $store:expr) => {
        ScriptContext {
            chain: &$test.chain,
            config: &$test.config,
            artifacts: &$artifacts,
            store: &$store,
            deployer: DEPLOYER,
        }
    };
}

#[tokio::test]
async fn test_mocks_are_distinct_and_persisted() {
    let test = TestContext::new(31337, &["LinkToken", "VRFCoordinatorMock"]);
    let artifacts = test.artifacts();
    let store = test.store();
    let ctx = script_ctx!(test, artifacts, store);

    let mocks = run_mocks(&ctx).await.unwrap().unwrap();
    assert_ne!(mocks.link_token, Address::ZERO);
    assert_ne!(mocks.vrf_coordinator, Address::ZERO);
    assert_ne!(mocks.link_token, mocks.vrf_coordinator);

    // The coordinator's constructor takes the token address
    let sent = test.chain.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].data.ends_with(&mocks.link_token.into_word().0));

    // Both records are readable back from the store
    assert_eq!(
        store.load("LinkToken").unwrap().unwrap().address,
        mocks.link_token
    );
    assert_eq!(
        store.load("VRFCoordinatorMock").unwrap().unwrap().address,
        mocks.vrf_coordinator
    );
}

#[tokio::test]
async fn test_mocks_are_skipped_on_a_persistent_network() {
    let test = TestContext::new(4, &["LinkToken", "VRFCoordinatorMock"]);
    let artifacts = test.artifacts();
    let store = test.store();
    let ctx = script_ctx!(test, artifacts, store);

    assert!(run_mocks(&ctx).await.unwrap().is_none());
    assert!(test.chain.sent().is_empty());
}

#[tokio::test]
async fn test_end_to_end_two_phase_mint_on_the_local_network() {
    let test = TestContext::new(31337, &["LinkToken", "VRFCoordinatorMock", "RandomSVGNFT"]);
    let artifacts = test.artifacts();
    let store = test.store();
    let ctx = script_ctx!(test, artifacts, store);

    let mocks = run_mocks(&ctx).await.unwrap().unwrap();
    let uris = run_random_svg(&ctx, 2).await.unwrap();

    assert_eq!(uris.len(), 2);
    assert!(uris.iter().all(|uri| !uri.is_empty()));

    // The target deployment is parameterized by the resolved VRF set:
    // coordinator, token, key hash, fee.
    let sent = test.chain.sent();
    let create = &sent[2];
    assert!(create.to.is_none());
    let args_start = create.data.len() - 4 * 32;
    let args = &create.data[args_start..];
    assert_eq!(&args[..32], &mocks.vrf_coordinator.into_word().0);
    assert_eq!(&args[32..64], &mocks.link_token.into_word().0);
    assert_eq!(&args[64..96], &test.config.key_hash.0);
    assert_eq!(
        U256::from_be_slice(&args[96..128]),
        U256::from(100_000_000_000_000_000u128)
    );

    // Per mint: fund, request, mock callback, finish. Two mint cycles
    // follow the three deployments.
    let selectors: Vec<[u8; 4]> = sent[3..]
        .iter()
        .map(|request| request.data[..4].try_into().unwrap())
        .collect();
    let expected_cycle = [
        selector("transfer(address,uint256)"),
        selector("startMint()"),
        selector("callBackWithRandomness(bytes32,uint256,address)"),
        selector("finishMint(uint256)"),
    ];
    assert_eq!(selectors.len(), 8);
    assert_eq!(&selectors[..4], &expected_cycle);
    assert_eq!(&selectors[4..], &expected_cycle);

    // The callback delivered the placeholder randomness for both mints,
    // and both tokens finished in order.
    let fulfilled = test.chain.fulfilled();
    assert_eq!(fulfilled.len(), 2);
    assert!(
        fulfilled
            .iter()
            .all(|(_, randomness)| *randomness == U256::from(MOCK_RANDOMNESS))
    );
    assert_eq!(test.chain.finished(), vec![U256::ZERO, U256::from(1u64)]);

    // Each mint paid the oracle fee to the contract.
    let contract = store.load("RandomSVGNFT").unwrap().unwrap().address;
    assert_eq!(
        test.chain.balance(mocks.link_token, contract),
        U256::from(2u64) * test.config.fee
    );
}

#[tokio::test]
async fn test_random_svg_requires_provisioned_mocks() {
    let test = TestContext::new(31337, &["LinkToken", "VRFCoordinatorMock", "RandomSVGNFT"]);
    let artifacts = test.artifacts();
    let store = test.store();
    let ctx = script_ctx!(test, artifacts, store);

    // No run_mocks first: parameter resolution must fail before any
    // transaction goes out.
    assert!(run_random_svg(&ctx, 1).await.is_err());
    assert!(test.chain.sent().is_empty());
}

#[tokio::test]
async fn test_svg_script_mints_every_image() {
    let test = TestContext::new(31337, &["SVGNFT"]);
    let artifacts = test.artifacts();
    let store = test.store();
    let ctx = script_ctx!(test, artifacts, store);

    let svgs = vec![
        "<svg><circle r=\"1\"></circle></svg>".to_string(),
        "<svg><rect width=\"2\"></rect></svg>".to_string(),
    ];
    let uris = run_svg(&ctx, &svgs).await.unwrap();
    assert_eq!(uris.len(), 2);
    assert!(uris.iter().all(|uri| !uri.is_empty()));

    // One create, then one mint carrying each SVG payload verbatim.
    let sent = test.chain.sent();
    assert_eq!(sent.len(), 3);
    for (request, svg) in sent[1..].iter().zip(&svgs) {
        assert_eq!(&request.data[..4], &selector("mint(string)"));
        assert!(
            request
                .data
                .windows(svg.len())
                .any(|window| window == svg.as_bytes())
        );
    }
}

#[tokio::test]
async fn test_funding_raises_the_balance_by_exactly_the_fee() {
    let test = TestContext::new(31337, &[]);
    let link_token = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    let recipient = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    let fee = test.config.fee;

    let before = test.chain.balance(link_token, recipient);
    let reported = fund_with_link(&test.chain, link_token, fee, recipient, DEPLOYER)
        .await
        .unwrap();
    let after = test.chain.balance(link_token, recipient);

    assert_eq!(after - before, fee);
    assert_eq!(reported, after);
}
