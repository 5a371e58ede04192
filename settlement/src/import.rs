//! Import verification.
//!
//! Everything an import needs is checked and staged here without touching
//! manager state; the manager commits the resulting plan in one step.

use serde::{Deserialize, Serialize};
use xbridge_codec::{ExportCommitment, LaunchToken, ReserveTransfer, WireCodec};
use xbridge_notarization::NotarizationLedger;
use xbridge_proof::{ComponentType, PartialTransactionProof, ProofError};
use xbridge_types::{CurrencyId, Hash256};

use crate::error::SettlementError;
use crate::token::ImportKey;

/// What happened to one transfer of an import.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportOutcome {
    Applied,
    AlreadyImported,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub txid: Hash256,
    pub notarization: Hash256,
    pub outcomes: Vec<(ImportKey, ImportOutcome)>,
    pub launched: Vec<LaunchToken>,
}

impl ImportReport {
    pub fn applied(&self) -> usize {
        self.count(ImportOutcome::Applied)
    }

    pub fn skipped(&self) -> usize {
        self.count(ImportOutcome::AlreadyImported)
    }

    fn count(&self, outcome: ImportOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// One verified transfer and the currency it launches, if any.
pub(crate) struct StagedTransfer {
    pub key: ImportKey,
    pub transfer: ReserveTransfer,
    pub launch: Option<LaunchToken>,
}

/// A fully verified import, ready to commit.
pub(crate) struct ImportPlan {
    pub txid: Hash256,
    pub transfers: Vec<StagedTransfer>,
}

pub(crate) struct ImportContext<'a> {
    pub codec: &'a WireCodec,
    pub ledger: &'a NotarizationLedger,
    pub retention_window: usize,
    pub source_system: CurrencyId,
}

impl ImportContext<'_> {
    pub fn verify(
        &self,
        proof: &PartialTransactionProof,
        serialized: &[u8],
        notarization_ref: &Hash256,
    ) -> Result<ImportPlan, SettlementError> {
        let record = match self.ledger.find_best_fork(notarization_ref) {
            Some((slot, record)) if slot < self.retention_window => record,
            _ => return Err(SettlementError::StaleNotarization(*notarization_ref)),
        };

        let verified = proof.check()?;
        if verified.root != record.state_root {
            return Err(ProofError::RootMismatch {
                expected: record.state_root,
                actual: verified.root,
            }
            .into());
        }
        if verified.height > record.height {
            return Err(ProofError::HeightAboveRoot {
                height: verified.height,
                notarized: record.height,
            }
            .into());
        }

        let outputs: Vec<_> = proof.components_of(ComponentType::Output).collect();
        let [output] = outputs.as_slice() else {
            return Err(SettlementError::ExportCommitmentCount(outputs.len()));
        };
        let commitment = ExportCommitment::from_bytes(&output.el_vch_obj)?;
        if commitment.source_system != self.source_system {
            return Err(SettlementError::WrongSourceSystem {
                expected: self.source_system,
                actual: commitment.source_system,
            });
        }
        if !commitment.matches(serialized) {
            return Err(SettlementError::CommitmentMismatch);
        }

        let decoded = self
            .codec
            .decode_exact(serialized, commitment.transfer_count as usize)?;
        let mut transfers = Vec::with_capacity(decoded.len());
        for (i, transfer) in decoded.into_iter().enumerate() {
            let vout = u32::try_from(i)
                .ok()
                .and_then(|i| commitment.first_output.checked_add(i))
                .ok_or(SettlementError::OutputIndexOverflow(i))?;
            let launch = transfer.launch_token(self.codec.max_aux_depth())?;
            transfers.push(StagedTransfer {
                key: ImportKey {
                    txid: verified.txid,
                    vout,
                },
                transfer,
                launch,
            });
        }
        Ok(ImportPlan {
            txid: verified.txid,
            transfers,
        })
    }
}
