//! Deployment parameters shared by every component.
//!
//! Nothing here is a compile-time protocol constant: each value is chosen at
//! deployment and passed to the components when they are constructed.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::hash::CurrencyId;

/// How many matching attestations promote a notarization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum QuorumPolicy {
    /// `floor(N / 2) + 1` of the registered notaries.
    Majority,
    /// An explicit count, `1 <= k <= N`.
    Fixed(usize),
}

impl QuorumPolicy {
    /// Resolve the threshold for a set of `notary_count` notaries.
    pub fn threshold(&self, notary_count: usize) -> Result<usize, TypesError> {
        let k = match *self {
            QuorumPolicy::Majority => notary_count / 2 + 1,
            QuorumPolicy::Fixed(k) => k,
        };
        if k == 0 || k > notary_count {
            return Err(TypesError::InvalidParams(format!(
                "quorum {k} is unreachable with {notary_count} notaries"
            )));
        }
        Ok(k)
    }
}

/// What happens to attestations for losing hashes when a round completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleVotePolicy {
    /// Every slot is wiped when a record is promoted.
    #[default]
    Clear,
    /// Only slots holding the promoted hash are wiped; votes for other hashes
    /// carry into the next round until overwritten.
    Persist,
}

/// All deployment parameters of the bridge core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeParams {
    // ── Notarization ─────────────────────────────────────────────────────
    pub quorum: QuorumPolicy,

    /// Length of the attestation rolling buffer. `None` sizes it to the
    /// notary count; an explicit value must be at least the notary count.
    pub attestation_buffer_len: Option<usize>,

    /// Number of canonical records kept in the best-fork ring.
    pub best_fork_slots: usize,

    pub stale_vote_policy: StaleVotePolicy,

    // ── Governance ───────────────────────────────────────────────────────
    pub governance_buffer_len: usize,
    pub governance_threshold: usize,

    // ── Settlement ───────────────────────────────────────────────────────
    /// Height of the first export batch.
    pub genesis_height: u32,

    /// Export batch width in source-chain blocks.
    pub batch_interval: u32,

    /// Imports must reference a record in best-fork slots `0..retention_window`.
    pub retention_window: usize,

    /// System id stamped into export commitments produced by this side.
    pub source_system_id: CurrencyId,

    // ── Codec ────────────────────────────────────────────────────────────
    /// Maximum nesting of auxiliary transfer destinations.
    pub max_aux_depth: usize,
}

impl BridgeParams {
    pub fn mainnet_defaults() -> Self {
        Self {
            quorum: QuorumPolicy::Majority,
            attestation_buffer_len: None,
            best_fork_slots: 100,
            stale_vote_policy: StaleVotePolicy::Clear,

            governance_buffer_len: 25,
            governance_threshold: 13,

            genesis_height: 0,
            batch_interval: 10,
            retention_window: 50,
            source_system_id: CurrencyId::ZERO,

            max_aux_depth: 1,
        }
    }

    /// Small buffers and short batches for local testing.
    pub fn testnet_defaults() -> Self {
        Self {
            best_fork_slots: 8,
            governance_buffer_len: 5,
            governance_threshold: 3,
            batch_interval: 100,
            retention_window: 4,
            ..Self::mainnet_defaults()
        }
    }

    /// Check internal consistency, and consistency with a notary set of
    /// `notary_count` members.
    pub fn validate(&self, notary_count: usize) -> Result<(), TypesError> {
        self.quorum.threshold(notary_count)?;
        if let Some(len) = self.attestation_buffer_len {
            if len < notary_count {
                return Err(TypesError::InvalidParams(format!(
                    "attestation buffer ({len}) shorter than notary set ({notary_count})"
                )));
            }
        }
        if self.best_fork_slots == 0 {
            return Err(TypesError::InvalidParams("best_fork_slots must be positive".into()));
        }
        if self.retention_window == 0 || self.retention_window > self.best_fork_slots {
            return Err(TypesError::InvalidParams(format!(
                "retention window {} must be within 1..={}",
                self.retention_window, self.best_fork_slots
            )));
        }
        if self.governance_buffer_len == 0
            || self.governance_threshold == 0
            || self.governance_threshold > self.governance_buffer_len
        {
            return Err(TypesError::InvalidParams(format!(
                "governance threshold {} must be within 1..={}",
                self.governance_threshold, self.governance_buffer_len
            )));
        }
        if self.batch_interval == 0 {
            return Err(TypesError::InvalidParams("batch_interval must be positive".into()));
        }
        Ok(())
    }

    /// Attestation buffer length for a set of `notary_count` notaries.
    pub fn attestation_buffer_len_for(&self, notary_count: usize) -> usize {
        self.attestation_buffer_len.unwrap_or(notary_count)
    }
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self::mainnet_defaults()
    }
}
