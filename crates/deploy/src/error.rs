//! Error taxonomy for the deployment scripts.

use thiserror::Error;

/// Errors raised by the deployment and minting flows.
///
/// Every variant aborts the running script immediately; nothing is caught
/// or retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeployError {
    /// The chain id is absent from the static network table.
    #[error("no network configuration for chain id {0}")]
    Configuration(u64),

    /// A deployment transaction failed, or its result was unusable.
    #[error("deployment of {name} failed: {reason}")]
    Deployment { name: String, reason: String },

    /// A receipt did not carry the expected event/log shape. Signals a
    /// contract-interface mismatch, not a transient condition.
    #[error("unexpected receipt shape: {0}")]
    Protocol(String),

    /// A token funding transfer failed.
    #[error("token transfer failed: {0}")]
    Transfer(String),
}
