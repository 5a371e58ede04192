//! Transfer destinations.
//!
//! The leading type byte packs the destination kind into its low six bits
//! and two presence flags into the top bits: `0x80` (a gateway section
//! follows the payload) and `0x40` (a list of auxiliary destinations
//! follows). Auxiliary destinations are themselves destinations, each
//! wrapped in a compact-size length, so decoding recurses and carries an
//! explicit depth guard.

use serde::{Deserialize, Serialize};
use xbridge_types::CurrencyId;

use crate::currency::CurrencyDefinition;
use crate::cursor::{self, Reader};
use crate::error::CodecError;

pub const FLAG_DEST_AUX: u8 = 0x40;
pub const FLAG_DEST_GATEWAY: u8 = 0x80;
const KIND_MASK: u8 = 0x3F;

/// Base destination kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DestinationKind {
    PublicKey = 1,
    PublicKeyHash = 2,
    ScriptHash = 3,
    Identity = 4,
    FullIdentity = 5,
    RegisterCurrency = 6,
    Quantum = 7,
    NestedTransfer = 8,
    Eth = 9,
    EthNft = 10,
    Raw = 11,
}

impl DestinationKind {
    /// Required payload length, for kinds with a fixed-size payload.
    pub fn payload_len(self) -> Option<usize> {
        match self {
            DestinationKind::PublicKey => Some(33),
            DestinationKind::PublicKeyHash
            | DestinationKind::ScriptHash
            | DestinationKind::Identity
            | DestinationKind::Eth => Some(20),
            DestinationKind::EthNft => Some(20 + 32),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DestinationKind::PublicKey => "public-key",
            DestinationKind::PublicKeyHash => "public-key-hash",
            DestinationKind::ScriptHash => "script-hash",
            DestinationKind::Identity => "identity",
            DestinationKind::FullIdentity => "full-identity",
            DestinationKind::RegisterCurrency => "register-currency",
            DestinationKind::Quantum => "quantum",
            DestinationKind::NestedTransfer => "nested-transfer",
            DestinationKind::Eth => "eth",
            DestinationKind::EthNft => "eth-nft",
            DestinationKind::Raw => "raw",
        }
    }
}

impl TryFrom<u8> for DestinationKind {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Ok(match tag {
            1 => DestinationKind::PublicKey,
            2 => DestinationKind::PublicKeyHash,
            3 => DestinationKind::ScriptHash,
            4 => DestinationKind::Identity,
            5 => DestinationKind::FullIdentity,
            6 => DestinationKind::RegisterCurrency,
            7 => DestinationKind::Quantum,
            8 => DestinationKind::NestedTransfer,
            9 => DestinationKind::Eth,
            10 => DestinationKind::EthNft,
            11 => DestinationKind::Raw,
            other => return Err(CodecError::InvalidDestinationType(other)),
        })
    }
}

/// Gateway section: routes the transfer through another system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub gateway_id: CurrencyId,
    pub gateway_code: CurrencyId,
    pub fees: u64,
}

/// Where a reserve transfer delivers its value.
///
/// The `AUX` and `GATEWAY` type flags are derived from `aux_dests` and
/// `gateway`, so the flag/field invariants hold by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDestination {
    pub kind: DestinationKind,
    pub destination_bytes: Vec<u8>,
    pub gateway: Option<Gateway>,
    pub aux_dests: Vec<TransferDestination>,
}

impl TransferDestination {
    pub fn new(kind: DestinationKind, destination_bytes: Vec<u8>) -> Self {
        Self {
            kind,
            destination_bytes,
            gateway: None,
            aux_dests: Vec::new(),
        }
    }

    pub fn public_key_hash(hash: CurrencyId) -> Self {
        Self::new(DestinationKind::PublicKeyHash, hash.as_bytes().to_vec())
    }

    pub fn identity(id: CurrencyId) -> Self {
        Self::new(DestinationKind::Identity, id.as_bytes().to_vec())
    }

    pub fn eth(address: CurrencyId) -> Self {
        Self::new(DestinationKind::Eth, address.as_bytes().to_vec())
    }

    pub fn raw(bytes: Vec<u8>) -> Self {
        Self::new(DestinationKind::Raw, bytes)
    }

    pub fn register_currency(definition: &CurrencyDefinition) -> Self {
        let mut payload = Vec::new();
        definition.encode(&mut payload);
        Self::new(DestinationKind::RegisterCurrency, payload)
    }

    pub fn with_gateway(mut self, gateway: Gateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_aux(mut self, aux: TransferDestination) -> Self {
        self.aux_dests.push(aux);
        self
    }

    /// The packed type byte as it appears on the wire.
    pub fn type_byte(&self) -> u8 {
        let mut tag = self.kind as u8;
        if self.gateway.is_some() {
            tag |= FLAG_DEST_GATEWAY;
        }
        if !self.aux_dests.is_empty() {
            tag |= FLAG_DEST_AUX;
        }
        tag
    }

    /// The 20-byte payload of hash-like kinds.
    pub fn as_id(&self) -> Option<CurrencyId> {
        match self.kind.payload_len() {
            Some(20) => CurrencyId::from_slice(&self.destination_bytes).ok(),
            _ => None,
        }
    }

    /// Decode the embedded currency definition of a register-currency
    /// destination.
    pub fn currency_definition(&self, max_depth: usize) -> Result<CurrencyDefinition, CodecError> {
        if self.kind != DestinationKind::RegisterCurrency {
            return Err(CodecError::InvalidCurrencyDefinition(format!(
                "{} destination carries no currency definition",
                self.kind.name()
            )));
        }
        let mut r = Reader::new(&self.destination_bytes);
        let def = CurrencyDefinition::decode(&mut r, 1, max_depth)?;
        r.finish()?;
        Ok(def)
    }

    /// Check payload sizes, gateway amounts and nesting depth. `depth` is the
    /// nesting level of `self` (0 for a transfer's own destination).
    pub fn validate(&self, depth: usize, max_depth: usize) -> Result<(), CodecError> {
        if depth > max_depth {
            return Err(CodecError::NestingTooDeep(max_depth));
        }
        if let Some(expected) = self.kind.payload_len() {
            if self.destination_bytes.len() != expected {
                return Err(CodecError::InvalidDestinationLength {
                    kind: self.kind.name(),
                    expected,
                    actual: self.destination_bytes.len(),
                });
            }
        }
        if self.kind == DestinationKind::RegisterCurrency {
            let mut r = Reader::new(&self.destination_bytes);
            CurrencyDefinition::decode(&mut r, depth + 1, max_depth)?;
            r.finish()?;
        }
        if let Some(gateway) = &self.gateway {
            cursor::check_amount(gateway.fees)?;
        }
        for aux in &self.aux_dests {
            aux.validate(depth + 1, max_depth)?;
        }
        Ok(())
    }

    /// Append the wire form. The destination must already be valid.
    pub fn encode(&self, out: &mut Vec<u8>) {
        cursor::write_u8(out, self.type_byte());
        cursor::write_var_bytes(out, &self.destination_bytes);
        if let Some(gateway) = &self.gateway {
            cursor::write_id(out, &gateway.gateway_id);
            cursor::write_id(out, &gateway.gateway_code);
            cursor::write_u64_le(out, gateway.fees);
        }
        if !self.aux_dests.is_empty() {
            cursor::write_compact_size(out, self.aux_dests.len() as u64);
            for aux in &self.aux_dests {
                let mut nested = Vec::new();
                aux.encode(&mut nested);
                cursor::write_var_bytes(out, &nested);
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>, depth: usize, max_depth: usize) -> Result<Self, CodecError> {
        if depth > max_depth {
            return Err(CodecError::NestingTooDeep(max_depth));
        }
        let tag = r.read_u8()?;
        let kind = DestinationKind::try_from(tag & KIND_MASK)
            .map_err(|_| CodecError::InvalidDestinationType(tag))?;
        let mut dest = Self::new(kind, r.read_var_bytes()?.to_vec());

        if tag & FLAG_DEST_GATEWAY != 0 {
            dest.gateway = Some(Gateway {
                gateway_id: r.read_id()?,
                gateway_code: r.read_id()?,
                fees: r.read_amount()?,
            });
        }

        if tag & FLAG_DEST_AUX != 0 {
            if depth + 1 > max_depth {
                return Err(CodecError::NestingTooDeep(max_depth));
            }
            // Each nested entry is at least a length byte plus type and
            // payload-length bytes.
            let count = r.read_count(3)?;
            if count == 0 {
                return Err(CodecError::EmptyAuxDestinations);
            }
            for _ in 0..count {
                let blob = r.read_var_bytes()?;
                let mut inner = Reader::new(blob);
                let aux = Self::decode(&mut inner, depth + 1, max_depth)?;
                inner.finish()?;
                dest.aux_dests.push(aux);
            }
        }

        if let Some(expected) = kind.payload_len() {
            if dest.destination_bytes.len() != expected {
                return Err(CodecError::InvalidDestinationLength {
                    kind: kind.name(),
                    expected,
                    actual: dest.destination_bytes.len(),
                });
            }
        }
        if kind == DestinationKind::RegisterCurrency {
            let mut inner = Reader::new(&dest.destination_bytes);
            CurrencyDefinition::decode(&mut inner, depth + 1, max_depth)?;
            inner.finish()?;
        }
        Ok(dest)
    }
}
