use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use url::Url;

/// Where a minted SVG image comes from.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SvgSource {
    /// Generate a fresh rose pattern.
    Generate,
    /// Read the image from a file.
    #[strum(default)]
    Path(String),
}

#[derive(Parser)]
#[command(name = "rosemint")]
#[command(
    author,
    version,
    about = "Deploy the rosemint NFT contracts and exercise them by minting"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "ROSEMINT_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// JSON-RPC endpoint of the target node.
    #[arg(
        long,
        alias = "rpc",
        env = "ROSEMINT_RPC_URL",
        default_value = "http://127.0.0.1:8545"
    )]
    pub rpc_url: Url,

    /// Directory of compiled contract artifacts (one `<Name>.json` per
    /// contract).
    #[arg(long, env = "ROSEMINT_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Directory where deployment records are saved, per network.
    #[arg(long, env = "ROSEMINT_DEPLOYMENTS", default_value = "deployments")]
    pub deployments: PathBuf,

    /// Deployer account. If not provided, the node's first managed
    /// account is used.
    #[arg(long, env = "ROSEMINT_FROM")]
    pub from: Option<Address>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Deploy the local-network stand-ins (LINK token + VRF coordinator).
    Mocks,

    /// Deploy the plain SVG collection and mint images onto it.
    Svg {
        /// `generate` for a fresh rose pattern, or a path to an SVG
        /// file. Repeatable; two generated patterns by default.
        #[arg(long = "svg")]
        svgs: Vec<SvgSource>,
    },

    /// Deploy the randomness-backed collection and run funded two-phase
    /// mints against it. On the local network the mocks must be
    /// deployed first.
    RandomSvg {
        /// Number of two-phase mints to run.
        #[arg(long, default_value_t = 2)]
        mints: usize,
    },

    /// Run every script in order: mocks, svg, random-svg.
    All {
        /// SVG sources for the plain collection.
        #[arg(long = "svg")]
        svgs: Vec<SvgSource>,

        /// Number of two-phase mints to run.
        #[arg(long, default_value_t = 2)]
        mints: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_svg_source_keyword() {
        assert_eq!(SvgSource::from_str("generate").unwrap(), SvgSource::Generate);
    }

    #[test]
    fn test_svg_source_falls_back_to_a_path() {
        assert_eq!(
            SvgSource::from_str("svg/deploy/circle.svg").unwrap(),
            SvgSource::Path("svg/deploy/circle.svg".to_string())
        );
    }
}
