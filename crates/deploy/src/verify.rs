//! Block-explorer verification notice.

use crate::abi;
use crate::contracts::ContractSpec;
use crate::error::DeployError;
use crate::network::NetworkConfig;

/// The command that registers a deployed contract's source with the block
/// explorer, or `None` on the local network where verification is
/// meaningless.
pub fn verification_command(
    config: &NetworkConfig,
    spec: &ContractSpec,
) -> Result<Option<String>, DeployError> {
    if config.is_local() {
        return Ok(None);
    }

    let address = spec.address()?;
    let mut command = format!(
        "forge verify-contract --chain {} {} {}",
        config.name, address, spec.name
    );
    if !spec.constructor_args.is_empty() {
        let encoded = abi::encode_words(&spec.constructor_args);
        command.push_str(" --constructor-args 0x");
        command.push_str(&hex::encode(encoded));
    }
    Ok(Some(command))
}

/// Log the verification command when there is one.
pub fn announce_verification(
    config: &NetworkConfig,
    spec: &ContractSpec,
) -> Result<(), DeployError> {
    if let Some(command) = verification_command(config, spec)? {
        tracing::info!(contract = %spec.name, "Verify with: $ {}", command);
    }
    Ok(())
}
