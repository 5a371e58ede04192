//! Outbound export batches.

use serde::{Deserialize, Serialize};
use xbridge_codec::{CodecError, CurrencyValueMap, ExportCommitment, ReserveTransfer, WireCodec};
use xbridge_types::CurrencyId;

/// Value and fee totals of a batch, per currency.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    pub values: CurrencyValueMap,
    pub fees: CurrencyValueMap,
}

impl BatchTotals {
    pub fn add(&mut self, transfer: &ReserveTransfer) -> Result<(), CodecError> {
        self.values.merge(&transfer.values)?;
        self.fees.add(transfer.fee_currency_id, transfer.fee_amount)
    }
}

/// A closed batch covering source heights `[start_height, end_height)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBatch {
    pub start_height: u32,
    pub end_height: u32,
    pub transfers: Vec<ReserveTransfer>,
    pub totals: BatchTotals,
    /// The transfers in wire form, as committed to.
    pub serialized: Vec<u8>,
    pub commitment: ExportCommitment,
}

impl ExportBatch {
    pub fn overlaps(&self, from: u32, to: u32) -> bool {
        self.start_height < to && self.end_height > from
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// The batch currently accepting transfers.
#[derive(Clone, Debug)]
pub(crate) struct OpenBatch {
    pub start_height: u32,
    /// Highest height a transfer was recorded at.
    pub last_height: Option<u32>,
    pub transfers: Vec<ReserveTransfer>,
    pub totals: BatchTotals,
}

impl OpenBatch {
    pub fn new(start_height: u32) -> Self {
        Self {
            start_height,
            last_height: None,
            transfers: Vec::new(),
            totals: BatchTotals::default(),
        }
    }

    /// Seal the batch at `end_height` and open its successor there.
    pub fn close(
        &mut self,
        end_height: u32,
        codec: &WireCodec,
        source_system: CurrencyId,
    ) -> Result<ExportBatch, CodecError> {
        let serialized = codec.encode_all(&self.transfers)?;
        let commitment = ExportCommitment::new(
            source_system,
            self.start_height,
            end_height,
            0,
            self.transfers.len() as u32,
            &serialized,
        );
        let sealed = std::mem::replace(self, OpenBatch::new(end_height));
        Ok(ExportBatch {
            start_height: sealed.start_height,
            end_height,
            transfers: sealed.transfers,
            totals: sealed.totals,
            serialized,
            commitment,
        })
    }
}
