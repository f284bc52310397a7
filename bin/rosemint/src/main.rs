//! rosemint is a CLI tool that deploys the rosemint NFT contracts and
//! exercises them by minting.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command, SvgSource};
use rosemint_deploy::{
    ArtifactStore, DeploymentStore, EthClient, ScriptContext, network_config, run_mocks,
    run_random_svg, run_svg, svg::RosePattern,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let client = EthClient::new(cli.rpc_url.as_str())?;
    let chain_id = client
        .chain_id()
        .await
        .context("Failed to query the node's chain id")?;
    let config = network_config(chain_id)?;

    let deployer = match cli.from {
        Some(address) => address,
        None => *client
            .accounts()
            .await
            .context("Failed to list the node's accounts")?
            .first()
            .context("The node manages no accounts; pass --from")?,
    };

    tracing::info!(
        network = config.name,
        chain_id,
        deployer = %deployer,
        "Running deploy scripts..."
    );

    let artifacts = ArtifactStore::new(&cli.artifacts);
    let store = DeploymentStore::new(&cli.deployments, config.name);
    let ctx = ScriptContext {
        chain: &client,
        config: &config,
        artifacts: &artifacts,
        store: &store,
        deployer,
    };

    match cli.command {
        Command::Mocks => {
            run_mocks(&ctx).await?;
        }
        Command::Svg { svgs } => {
            let images = load_svgs(&svgs)?;
            run_svg(&ctx, &images).await?;
        }
        Command::RandomSvg { mints } => {
            run_random_svg(&ctx, mints).await?;
        }
        Command::All { svgs, mints } => {
            run_mocks(&ctx).await?;
            let images = load_svgs(&svgs)?;
            run_svg(&ctx, &images).await?;
            run_random_svg(&ctx, mints).await?;
        }
    }

    Ok(())
}

/// Resolve SVG sources to image contents. Defaults to two generated rose
/// patterns when nothing is specified.
fn load_svgs(sources: &[SvgSource]) -> Result<Vec<String>> {
    let defaults = [SvgSource::Generate, SvgSource::Generate];
    let sources = if sources.is_empty() {
        &defaults[..]
    } else {
        sources
    };

    sources
        .iter()
        .map(|source| match source {
            SvgSource::Generate => Ok(RosePattern::default().generate(&mut rand::rng())),
            SvgSource::Path(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read SVG file {path}")),
        })
        .collect()
}
