//! Persisted deployment records, one JSON file per contract per network.
//!
//! Later scripts read these back instead of re-deploying: the
//! randomness-backed deployment resolves the mock oracle addresses from
//! the records the mock script saved.

use std::path::PathBuf;

use alloy_core::primitives::{Address, B256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One saved deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    /// Constructor arguments as printed strings, for the record only.
    pub constructor_args: Vec<String>,
    pub transaction_hash: B256,
}

/// A per-network directory of deployment records.
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    dir: PathBuf,
}

impl DeploymentStore {
    /// Store rooted at `<root>/<network-name>/`; created on first save.
    pub fn new(root: impl Into<PathBuf>, network_name: &str) -> Self {
        Self {
            dir: root.into().join(network_name),
        }
    }

    fn record_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{contract_name}.json"))
    }

    pub fn save(&self, record: &DeploymentRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.record_path(&record.contract_name);
        let content = serde_json::to_string_pretty(record)
            .context("Failed to serialize deployment record")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(
            contract = %record.contract_name,
            path = %path.display(),
            "Deployment record saved"
        );
        Ok(())
    }

    /// Load a record by contract name; `None` if it was never deployed on
    /// this network.
    pub fn load(&self, contract_name: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract_name);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(record))
    }
}
