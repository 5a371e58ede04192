//! Bridge configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use xbridge_crypto::{decode_iaddress, encode_iaddress};
use xbridge_governance::ContractTable;
use xbridge_types::{BridgeParams, NotaryIdentity, NotarySet, PublicKey};
use xbridge_utils::LogFormat;

use crate::NodeError;

/// One genesis notary as written in the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaryEntry {
    /// Base58Check identity address.
    pub identity: String,
    /// Hex-encoded Ed25519 key attestations are signed with.
    pub signer: String,
    /// Hex-encoded Ed25519 recovery key.
    pub recovery: String,
}

impl NotaryEntry {
    pub fn from_identity(notary: &NotaryIdentity) -> Self {
        Self {
            identity: encode_iaddress(&notary.identity),
            signer: notary.signer.to_hex(),
            recovery: notary.recovery.to_hex(),
        }
    }

    fn parse(&self, index: usize) -> Result<NotaryIdentity, NodeError> {
        let invalid = |reason: String| NodeError::InvalidNotary { index, reason };
        Ok(NotaryIdentity {
            identity: decode_iaddress(&self.identity)
                .map_err(|e| invalid(format!("identity: {e}")))?,
            signer: PublicKey::from_hex(&self.signer)
                .map_err(|e| invalid(format!("signer: {e}")))?,
            recovery: PublicKey::from_hex(&self.recovery)
                .map_err(|e| invalid(format!("recovery: {e}")))?,
        })
    }
}

/// Configuration for a bridge core.
///
/// Can be loaded from a TOML file via [`BridgeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deployment parameters. Missing keys take mainnet defaults.
    #[serde(default)]
    pub params: BridgeParams,

    /// Genesis notary set, in slot order.
    #[serde(default)]
    pub notaries: Vec<NotaryEntry>,

    /// Initial contract table: component name to Base58Check address.
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BridgeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The genesis notary set, validated.
    pub fn notary_set(&self) -> Result<NotarySet, NodeError> {
        let notaries = self
            .notaries
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.parse(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NotarySet::new(notaries)?)
    }

    pub fn contract_table(&self) -> Result<ContractTable, NodeError> {
        self.contracts
            .iter()
            .map(|(name, address)| {
                decode_iaddress(address)
                    .map(|id| (name.clone(), id))
                    .map_err(|e| NodeError::InvalidContract {
                        name: name.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    /// Check everything a core built from this config would check.
    pub fn validate(&self) -> Result<(), NodeError> {
        let set = self.notary_set()?;
        self.params.validate(set.len())?;
        self.contract_table()?;
        if self.log_level.trim().is_empty() {
            return Err(NodeError::Config("log_level is empty".into()));
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: BridgeParams::default(),
            notaries: Vec::new(),
            contracts: BTreeMap::new(),
        }
    }
}
