//! The reserve transfer record.

use serde::{Deserialize, Serialize};
use xbridge_types::CurrencyId;

use crate::currency::LaunchToken;
use crate::cursor::{self, Reader};
use crate::destination::{DestinationKind, TransferDestination};
use crate::error::CodecError;
use crate::value_map::CurrencyValueMap;

/// Version bit selecting the multi-value form of the value map.
pub const VERSION_MULTIVALUE: u32 = 0x8000_0000;
pub const VERSION_CURRENT: u32 = 1;

/// Transfer flag bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferFlags(pub u32);

impl TransferFlags {
    pub const VALID: u32 = 0x1;
    pub const CONVERT: u32 = 0x2;
    pub const PRECONVERT: u32 = 0x4;
    pub const FEE_OUTPUT: u32 = 0x8;
    pub const DOUBLE_SEND: u32 = 0x10;
    pub const MINT_CURRENCY: u32 = 0x20;
    pub const CROSS_SYSTEM: u32 = 0x40;
    pub const BURN_CHANGE_PRICE: u32 = 0x80;
    pub const BURN_CHANGE_WEIGHT: u32 = 0x100;
    pub const IMPORT_TO_SOURCE: u32 = 0x200;
    pub const RESERVE_TO_RESERVE: u32 = 0x400;
    pub const REFUND: u32 = 0x800;
    pub const IDENTITY_EXPORT: u32 = 0x1000;
    pub const CURRENCY_EXPORT: u32 = 0x2000;
    pub const ARBITRAGE_ONLY: u32 = 0x4000;

    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    pub fn with(self, bits: u32) -> Self {
        Self(self.0 | bits)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveTransfer {
    pub version: u32,
    pub values: CurrencyValueMap,
    pub flags: TransferFlags,
    pub fee_currency_id: CurrencyId,
    pub fee_amount: u64,
    pub destination: TransferDestination,
    pub dest_currency_id: CurrencyId,
    pub second_reserve_id: Option<CurrencyId>,
    pub dest_system_id: Option<CurrencyId>,
}

impl ReserveTransfer {
    /// A plain valid value transfer. The value map form follows `values`.
    pub fn new(
        values: CurrencyValueMap,
        fee_currency_id: CurrencyId,
        fee_amount: u64,
        destination: TransferDestination,
        dest_currency_id: CurrencyId,
    ) -> Self {
        let version = if values.is_multivalue() {
            VERSION_CURRENT | VERSION_MULTIVALUE
        } else {
            VERSION_CURRENT
        };
        Self {
            version,
            values,
            flags: TransferFlags(TransferFlags::VALID),
            fee_currency_id,
            fee_amount,
            destination,
            dest_currency_id,
            second_reserve_id: None,
            dest_system_id: None,
        }
    }

    pub fn is_multivalue(&self) -> bool {
        self.version & VERSION_MULTIVALUE != 0
    }

    pub fn is_currency_export(&self) -> bool {
        self.flags.contains(TransferFlags::CURRENCY_EXPORT)
    }

    /// Check the structural invariants an encodable transfer must satisfy.
    pub fn validate(&self, max_aux_depth: usize) -> Result<(), CodecError> {
        if !self.flags.contains(TransferFlags::VALID) {
            return Err(CodecError::InvalidTransfer("VALID flag not set".into()));
        }
        if self.is_multivalue() != self.values.is_multivalue() {
            return Err(CodecError::InvalidTransfer(
                "version multivalue bit disagrees with value map form".into(),
            ));
        }
        self.values.validate()?;
        cursor::check_amount(self.fee_amount)?;
        check_optional(
            self.flags.contains(TransferFlags::RESERVE_TO_RESERVE),
            self.second_reserve_id.is_some(),
            "second reserve",
        )?;
        check_optional(
            self.flags.contains(TransferFlags::CROSS_SYSTEM),
            self.dest_system_id.is_some(),
            "destination system",
        )?;
        let registers = self.destination.kind == DestinationKind::RegisterCurrency;
        if self.is_currency_export() != registers {
            return Err(CodecError::InvalidTransfer(
                "CURRENCY_EXPORT requires a register-currency destination and vice versa".into(),
            ));
        }
        self.destination.validate(0, max_aux_depth)
    }

    /// Append the wire form. The transfer must already be valid.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        cursor::write_varint(out, u64::from(self.version));
        self.values.encode(out);
        cursor::write_varint(out, u64::from(self.flags.0));
        cursor::write_id(out, &self.fee_currency_id);
        cursor::write_varint(out, self.fee_amount);
        self.destination.encode(out);
        cursor::write_id(out, &self.dest_currency_id);
        if let Some(id) = &self.second_reserve_id {
            cursor::write_id(out, id);
        }
        if let Some(id) = &self.dest_system_id {
            cursor::write_id(out, id);
        }
    }

    pub fn decode(r: &mut Reader<'_>, max_aux_depth: usize) -> Result<Self, CodecError> {
        let version = r.read_varint_u32()?;
        let values = CurrencyValueMap::decode(r, version & VERSION_MULTIVALUE != 0)?;
        let flags = TransferFlags(r.read_varint_u32()?);
        let fee_currency_id = r.read_id()?;
        let fee_amount = r.read_varint_amount()?;
        let destination = TransferDestination::decode(r, 0, max_aux_depth)?;
        let dest_currency_id = r.read_id()?;
        let second_reserve_id = if flags.contains(TransferFlags::RESERVE_TO_RESERVE) {
            Some(r.read_id()?)
        } else {
            None
        };
        let dest_system_id = if flags.contains(TransferFlags::CROSS_SYSTEM) {
            Some(r.read_id()?)
        } else {
            None
        };
        let transfer = Self {
            version,
            values,
            flags,
            fee_currency_id,
            fee_amount,
            destination,
            dest_currency_id,
            second_reserve_id,
            dest_system_id,
        };
        if !transfer.flags.contains(TransferFlags::VALID) {
            return Err(CodecError::InvalidTransfer("VALID flag not set".into()));
        }
        if transfer.is_currency_export()
            != (transfer.destination.kind == DestinationKind::RegisterCurrency)
        {
            return Err(CodecError::InvalidTransfer(
                "CURRENCY_EXPORT requires a register-currency destination and vice versa".into(),
            ));
        }
        Ok(transfer)
    }

    /// The token mapping a currency-export transfer launches on the host
    /// chain. `None` for ordinary value transfers.
    pub fn launch_token(&self, max_aux_depth: usize) -> Result<Option<LaunchToken>, CodecError> {
        if !self.is_currency_export() {
            return Ok(None);
        }
        let def = self.destination.currency_definition(max_aux_depth)?;
        Ok(Some(LaunchToken::from_definition(self.dest_currency_id, &def)))
    }
}

fn check_optional(flag: bool, present: bool, what: &str) -> Result<(), CodecError> {
    match (flag, present) {
        (true, false) => Err(CodecError::InvalidTransfer(format!(
            "{what} id required by flags but absent"
        ))),
        (false, true) => Err(CodecError::InvalidTransfer(format!(
            "{what} id present without its flag"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{mapping, CurrencyDefinition};

    fn id(b: u8) -> CurrencyId {
        CurrencyId::new([b; 20])
    }

    fn sample() -> ReserveTransfer {
        ReserveTransfer::new(
            CurrencyValueMap::single(id(1), 100_000_000),
            id(2),
            2_000_000,
            TransferDestination::eth(id(3)),
            id(2),
        )
    }

    fn roundtrip(t: &ReserveTransfer) -> ReserveTransfer {
        t.validate(1).unwrap();
        let mut out = Vec::new();
        t.encode_into(&mut out);
        let mut r = Reader::new(&out);
        let back = ReserveTransfer::decode(&mut r, 1).unwrap();
        r.finish().unwrap();
        back
    }

    #[test]
    fn plain_transfer_roundtrips() {
        let t = sample();
        assert_eq!(roundtrip(&t), t);
    }

    #[test]
    fn optional_ids_follow_flags() {
        let mut t = sample();
        t.flags = t
            .flags
            .with(TransferFlags::RESERVE_TO_RESERVE | TransferFlags::CROSS_SYSTEM);
        assert!(t.validate(1).is_err());
        t.second_reserve_id = Some(id(5));
        t.dest_system_id = Some(id(6));
        assert_eq!(roundtrip(&t), t);

        t.flags = TransferFlags(TransferFlags::VALID);
        assert!(matches!(t.validate(1), Err(CodecError::InvalidTransfer(_))));
    }

    #[test]
    fn missing_valid_flag_rejected() {
        let mut t = sample();
        t.flags = TransferFlags(TransferFlags::CONVERT);
        let mut out = Vec::new();
        t.encode_into(&mut out);
        assert!(matches!(
            ReserveTransfer::decode(&mut Reader::new(&out), 1),
            Err(CodecError::InvalidTransfer(_))
        ));
    }

    #[test]
    fn multivalue_bit_must_match_map() {
        let mut t = sample();
        t.version |= VERSION_MULTIVALUE;
        assert!(t.validate(1).is_err());
    }

    #[test]
    fn currency_export_yields_launch_token() {
        let def = CurrencyDefinition {
            version: 1,
            options: 0,
            parent: id(2),
            name: "USDC".into(),
            launch_system_id: id(2),
            system_id: id(2),
            notarization_protocol: 2,
            proof_protocol: 2,
            native_currency: TransferDestination::eth(id(8)),
            pre_allocations: vec![],
        };
        let mut t = sample();
        t.flags = t.flags.with(TransferFlags::CURRENCY_EXPORT);
        t.destination = TransferDestination::register_currency(&def);
        t.dest_currency_id = id(4);
        assert_eq!(roundtrip(&t), t);

        let token = t.launch_token(1).unwrap().unwrap();
        assert_eq!(token.iaddress, id(4));
        assert_eq!(token.contract, id(8));
        assert_eq!(token.flags, mapping::ETHEREUM_OWNED | mapping::ERC20);
        assert_eq!(sample().launch_token(1).unwrap(), None);
    }

    #[test]
    fn currency_export_without_registration_rejected() {
        let mut t = sample();
        t.flags = t.flags.with(TransferFlags::CURRENCY_EXPORT);
        assert!(t.validate(1).is_err());
        let mut out = Vec::new();
        t.encode_into(&mut out);
        assert!(ReserveTransfer::decode(&mut Reader::new(&out), 1).is_err());
    }

    #[test]
    fn json_form_uses_hex_ids() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(&id(1).to_hex()));
        let back: ReserveTransfer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn fee_amount_bounded() {
        let mut t = sample();
        t.fee_amount = u64::MAX;
        assert_eq!(t.validate(1), Err(CodecError::AmountOutOfRange(u64::MAX)));
    }
}
