//! Reserve-transfer wire codec.
//!
//! Encodes and decodes the binary records a bridge export carries: currency
//! value maps, (possibly nested) transfer destinations, reserve transfers,
//! embedded currency definitions and export commitments. Decoding is
//! streaming and strict: every length is checked against the remaining
//! buffer and the first violation aborts with a [`CodecError`].

pub mod currency;
pub mod cursor;
pub mod destination;
pub mod error;
pub mod export;
pub mod transfer;
pub mod value_map;

pub use currency::{mapping, CurrencyDefinition, LaunchToken, OPTION_NFT_TOKEN, TOKEN_ID_NONE};
pub use cursor::{Reader, MAX_AMOUNT};
pub use destination::{DestinationKind, Gateway, TransferDestination};
pub use error::CodecError;
pub use export::ExportCommitment;
pub use transfer::{ReserveTransfer, TransferFlags, VERSION_CURRENT, VERSION_MULTIVALUE};
pub use value_map::CurrencyValueMap;

/// Depth of auxiliary-destination nesting observed on the wire.
pub const DEFAULT_MAX_AUX_DEPTH: usize = 1;

/// Fewest bytes any transfer decodes from: one-byte version, empty
/// multi-value map, flags and fee, two ids and a bare destination.
pub const MIN_TRANSFER_LEN: usize = 46;

/// Stateless encoder/decoder parameterised by the nesting bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireCodec {
    max_aux_depth: usize,
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AUX_DEPTH)
    }
}

impl WireCodec {
    pub fn new(max_aux_depth: usize) -> Self {
        Self { max_aux_depth }
    }

    pub fn max_aux_depth(&self) -> usize {
        self.max_aux_depth
    }

    /// Serialize one transfer after checking its invariants.
    pub fn encode(&self, transfer: &ReserveTransfer) -> Result<Vec<u8>, CodecError> {
        transfer.validate(self.max_aux_depth)?;
        let mut out = Vec::new();
        transfer.encode_into(&mut out);
        Ok(out)
    }

    /// Serialize a sequence of transfers back to back.
    pub fn encode_all(&self, transfers: &[ReserveTransfer]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        for transfer in transfers {
            transfer.validate(self.max_aux_depth)?;
            transfer.encode_into(&mut out);
        }
        Ok(out)
    }

    /// Decode exactly `count` transfers from the front of `bytes`, returning
    /// them with the number of bytes consumed. Bytes after the last record
    /// are left to the caller.
    pub fn decode(
        &self,
        bytes: &[u8],
        count: usize,
    ) -> Result<(Vec<ReserveTransfer>, usize), CodecError> {
        let mut r = Reader::new(bytes);
        let mut transfers = Vec::with_capacity(count.min(bytes.len() / MIN_TRANSFER_LEN));
        for decoded in 0..count {
            if r.is_empty() {
                return Err(CodecError::MissingTransfers {
                    expected: count,
                    decoded,
                });
            }
            transfers.push(ReserveTransfer::decode(&mut r, self.max_aux_depth)?);
        }
        Ok((transfers, r.position()))
    }

    /// Decode `count` transfers that must span the whole buffer.
    pub fn decode_exact(
        &self,
        bytes: &[u8],
        count: usize,
    ) -> Result<Vec<ReserveTransfer>, CodecError> {
        let (transfers, consumed) = self.decode(bytes, count)?;
        if consumed != bytes.len() {
            return Err(CodecError::TrailingBytes(bytes.len() - consumed));
        }
        Ok(transfers)
    }
}
