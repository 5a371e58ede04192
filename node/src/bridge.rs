//! The bridge core: every verification and settlement component wired to
//! one set of deployment parameters.

use tracing::info;
use xbridge_codec::ReserveTransfer;
use xbridge_governance::{ContractTable, GovernanceVoteTracker, Proposal};
use xbridge_notarization::{Attestation, AttestationOutcome, NotarizationLedger};
use xbridge_proof::PartialTransactionProof;
use xbridge_settlement::{ExportBatch, ExportImportManager, ImportReport, TokenManager};
use xbridge_types::{BridgeParams, Hash256, NotarySet};

use crate::config::BridgeConfig;
use crate::NodeError;

pub struct BridgeCore {
    params: BridgeParams,
    ledger: NotarizationLedger,
    governance: GovernanceVoteTracker,
    settlement: ExportImportManager,
}

impl BridgeCore {
    pub fn new(
        params: BridgeParams,
        notaries: NotarySet,
        contracts: ContractTable,
    ) -> Result<Self, NodeError> {
        params.validate(notaries.len())?;
        let governance = GovernanceVoteTracker::new(
            params.governance_buffer_len,
            params.governance_threshold,
            contracts,
        )?;
        let ledger = NotarizationLedger::new(notaries, &params)?;
        let settlement = ExportImportManager::new(&params)?;
        info!(
            notaries = ledger.notaries().len(),
            quorum = ledger.quorum(),
            batch_interval = params.batch_interval,
            "bridge core initialised"
        );
        Ok(Self {
            params,
            ledger,
            governance,
            settlement,
        })
    }

    pub fn from_config(config: &BridgeConfig) -> Result<Self, NodeError> {
        Self::new(
            config.params.clone(),
            config.notary_set()?,
            config.contract_table()?,
        )
    }

    pub fn params(&self) -> &BridgeParams {
        &self.params
    }

    pub fn ledger(&self) -> &NotarizationLedger {
        &self.ledger
    }

    pub fn governance(&self) -> &GovernanceVoteTracker {
        &self.governance
    }

    pub fn settlement(&self) -> &ExportImportManager {
        &self.settlement
    }

    // ── Notarization ───────────────────────────────────────────────────

    pub fn submit_attestation(
        &mut self,
        attestation: &Attestation,
    ) -> Result<AttestationOutcome, NodeError> {
        Ok(self.ledger.submit_attestation(attestation)?)
    }

    // ── Governance ─────────────────────────────────────────────────────

    /// Cast one governance vote for `proposal`; returns the slot written.
    pub fn cast_governance_vote(&mut self, proposal: &Proposal) -> usize {
        self.governance.cast_vote(proposal.hash())
    }

    /// Apply a proposal that has reached the governance threshold. A new
    /// notary set replaces the ledger's; a contract upgrade replaces the
    /// tracker's contract table.
    pub fn apply_proposal(&mut self, proposal: Proposal) -> Result<(), NodeError> {
        match proposal {
            Proposal::ReplaceNotarySet(set) => {
                self.params.validate(set.len())?;
                self.ledger.replace_notary_set(&mut self.governance, set)?;
            }
            upgrade @ Proposal::UpgradeContracts(_) => {
                self.governance.apply_proposal(&upgrade)?;
            }
        }
        Ok(())
    }

    // ── Settlement ─────────────────────────────────────────────────────

    pub fn record_outbound_transfer(
        &mut self,
        height: u32,
        transfer: ReserveTransfer,
    ) -> Result<(), NodeError> {
        Ok(self.settlement.record_outbound_transfer(height, transfer)?)
    }

    pub fn advance_height(&mut self, height: u32) -> Result<bool, NodeError> {
        Ok(self.settlement.advance_height(height)?)
    }

    pub fn flush(&mut self, height: u32) -> Result<bool, NodeError> {
        Ok(self.settlement.flush(height)?)
    }

    pub fn ready_exports(&self, from: u32, to: u32) -> Vec<&ExportBatch> {
        self.settlement.get_ready_exports_by_range(from, to)
    }

    /// Verify an inbound export against this core's ledger and settle it.
    pub fn submit_import<T: TokenManager + ?Sized>(
        &mut self,
        tokens: &mut T,
        proof: &PartialTransactionProof,
        serialized_transfers: &[u8],
        notarization_ref: &Hash256,
    ) -> Result<ImportReport, NodeError> {
        Ok(self.settlement.submit_import(
            &self.ledger,
            tokens,
            proof,
            serialized_transfers,
            notarization_ref,
        )?)
    }
}
