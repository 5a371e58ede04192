//! Export proofs assembled the way a relayer would.

use thiserror::Error;
use xbridge_codec::{CodecError, ExportCommitment, ReserveTransfer, WireCodec};
use xbridge_notarization::NotarizationRecord;
use xbridge_proof::{
    component_leaf, merkle_branch, merkle_root, mmr_branch, mmr_root, transaction_id,
    ComponentProof, ComponentType, PartialTransactionProof, ProofError, PARTIAL_PROOF_VERSION,
};
use xbridge_types::{CurrencyId, Hash256};

/// A source-side export: transfers, their commitment, and the proof that
/// the committing transaction is under some state root.
#[derive(Clone, Debug)]
pub struct SignedExport {
    pub transfers: Vec<ReserveTransfer>,
    pub serialized: Vec<u8>,
    pub commitment: ExportCommitment,
    pub proof: PartialTransactionProof,
    /// Leaves of the transaction's component tree, revealed or not.
    pub component_leaves: Vec<Hash256>,
    pub txid: Hash256,
    pub state_root: Hash256,
}

impl SignedExport {
    /// A record notarizing this export's state root at `height`.
    pub fn record(&self, height: u32) -> NotarizationRecord {
        NotarizationRecord::new(Hash256::new([0xee; 32]), 0, self.state_root, height)
    }
}

/// Builder for [`SignedExport`].
#[derive(Clone, Debug)]
pub struct ExportFixture {
    pub source_system: CurrencyId,
    pub start_height: u32,
    pub end_height: u32,
    pub first_output: u32,
    /// Position of the exporting transaction among the block range's
    /// transactions.
    pub tx_position: usize,
    pub tx_count: usize,
    /// Height stamped on the transaction branch.
    pub proof_height: u32,
    pub max_aux_depth: usize,
    /// Distinguishes otherwise identical exports.
    pub salt: u8,
    /// Unrevealed memo component appended after the output.
    pub memo: Option<Vec<u8>>,
}

impl ExportFixture {
    pub fn new(source_system: CurrencyId) -> Self {
        Self {
            source_system,
            start_height: 0,
            end_height: 100,
            first_output: 1,
            tx_position: 2,
            tx_count: 5,
            proof_height: 100,
            max_aux_depth: xbridge_codec::DEFAULT_MAX_AUX_DEPTH,
            salt: 0,
            memo: None,
        }
    }

    pub fn salt(mut self, salt: u8) -> Self {
        self.salt = salt;
        self
    }

    pub fn proof_height(mut self, height: u32) -> Self {
        self.proof_height = height;
        self
    }

    pub fn memo(mut self, memo: Vec<u8>) -> Self {
        self.memo = Some(memo);
        self
    }

    /// Serialize `transfers`, commit to them, and prove the commitment.
    ///
    /// The transaction has a header component, the commitment as its
    /// single output component and an optional memo; the proof reveals the
    /// header and the output. It sits in a mountain range of `tx_count`
    /// transactions whose root is the state root.
    pub fn build(&self, transfers: Vec<ReserveTransfer>) -> Result<SignedExport, FixtureError> {
        let codec = WireCodec::new(self.max_aux_depth);
        let serialized = codec.encode_all(&transfers)?;
        let commitment = ExportCommitment::new(
            self.source_system,
            self.start_height,
            self.end_height,
            self.first_output,
            transfers.len() as u32,
            &serialized,
        );

        let mut objects = vec![
            (ComponentType::Header, vec![0x01, self.salt]),
            (ComponentType::Output, commitment.to_bytes()),
        ];
        if let Some(memo) = &self.memo {
            objects.push((ComponentType::Memo, memo.clone()));
        }
        let leaves: Vec<Hash256> = objects
            .iter()
            .map(|(kind, obj)| component_leaf(*kind as u8, obj))
            .collect();
        let txid = transaction_id(&merkle_root(&leaves)?);

        let mut txs: Vec<Hash256> = (0..self.tx_count)
            .map(|i| Hash256::new([0x80 ^ i as u8; 32]))
            .collect();
        if self.tx_position >= txs.len() {
            return Err(ProofError::IndexOutOfRange {
                index: self.tx_position as u64,
                size: txs.len() as u64,
            }
            .into());
        }
        txs[self.tx_position] = txid;
        let state_root = mmr_root(&txs)?;
        let mut tx_branch = mmr_branch(&txs, self.tx_position)?;
        tx_branch.height = self.proof_height;

        let components = objects
            .into_iter()
            .take(2)
            .enumerate()
            .map(|(i, (kind, obj))| {
                Ok(ComponentProof {
                    el_type: kind as u8,
                    el_idx: i as u32,
                    el_vch_obj: obj,
                    el_proof: vec![merkle_branch(&leaves, i)?],
                })
            })
            .collect::<Result<Vec<_>, ProofError>>()?;

        Ok(SignedExport {
            transfers,
            serialized,
            commitment,
            proof: PartialTransactionProof {
                version: PARTIAL_PROOF_VERSION,
                tx_proof: vec![tx_branch],
                components,
            },
            component_leaves: leaves,
            txid,
            state_root,
        })
    }
}

/// Why a fixture could not be built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}
