//! Export commitments: the fixed-size digest of an outbound batch, carried
//! in the export output of the source transaction and checked on import.

use serde::{Deserialize, Serialize};
use xbridge_crypto::blake2b_256;
use xbridge_types::{CurrencyId, Hash256};

use crate::cursor::{self, Reader};
use crate::error::CodecError;

pub const EXPORT_COMMITMENT_VERSION: u8 = 1;
pub const EXPORT_COMMITMENT_LEN: usize = 1 + 20 + 4 * 4 + 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCommitment {
    pub source_system: CurrencyId,
    pub start_height: u32,
    pub end_height: u32,
    /// Output index of the first transfer; transfer `i` is output
    /// `first_output + i`.
    pub first_output: u32,
    pub transfer_count: u32,
    pub hash_transfers: Hash256,
}

impl ExportCommitment {
    pub fn new(
        source_system: CurrencyId,
        start_height: u32,
        end_height: u32,
        first_output: u32,
        transfer_count: u32,
        serialized_transfers: &[u8],
    ) -> Self {
        Self {
            source_system,
            start_height,
            end_height,
            first_output,
            transfer_count,
            hash_transfers: blake2b_256(serialized_transfers),
        }
    }

    pub fn matches(&self, serialized_transfers: &[u8]) -> bool {
        blake2b_256(serialized_transfers) == self.hash_transfers
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(EXPORT_COMMITMENT_LEN);
        cursor::write_u8(&mut out, EXPORT_COMMITMENT_VERSION);
        cursor::write_id(&mut out, &self.source_system);
        cursor::write_u32_le(&mut out, self.start_height);
        cursor::write_u32_le(&mut out, self.end_height);
        cursor::write_u32_le(&mut out, self.first_output);
        cursor::write_u32_le(&mut out, self.transfer_count);
        cursor::write_hash(&mut out, &self.hash_transfers);
        out
    }

    /// Parse a commitment that must span the whole buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = Reader::new(bytes);
        let version = r.read_u8()?;
        if version != EXPORT_COMMITMENT_VERSION {
            return Err(CodecError::UnsupportedVersion {
                what: "export commitment",
                version: u32::from(version),
            });
        }
        let commitment = Self {
            source_system: r.read_id()?,
            start_height: r.read_u32_le()?,
            end_height: r.read_u32_le()?,
            first_output: r.read_u32_le()?,
            transfer_count: r.read_u32_le()?,
            hash_transfers: r.read_hash()?,
        };
        r.finish()?;
        Ok(commitment)
    }
}
