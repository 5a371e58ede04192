//! Currency definitions carried by register-currency destinations, and the
//! `LaunchToken` record the host chain derives from them.

use serde::{Deserialize, Serialize};
use xbridge_types::CurrencyId;

use crate::cursor::{self, Reader};
use crate::destination::{DestinationKind, TransferDestination};
use crate::error::CodecError;

pub const MAX_NAME_LEN: usize = 64;

/// Currency option bit marking a single-unit NFT currency.
pub const OPTION_NFT_TOKEN: u32 = 0x800;

/// Ownership and token-standard bits of a host-chain token mapping.
pub mod mapping {
    pub const ETHEREUM_OWNED: u32 = 1;
    pub const VERUS_OWNED: u32 = 2;
    pub const PART_OF_BRIDGE: u32 = 4;
    pub const IS_BRIDGE_CURRENCY: u32 = 8;
    pub const ERC721: u32 = 16;
    pub const ERC20: u32 = 32;
    pub const ERC1155_NFT: u32 = 64;
    pub const ERC1155: u32 = 128;
}

/// Token id used when a mapping carries none.
pub const TOKEN_ID_NONE: [u8; 32] = [0u8; 32];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDefinition {
    pub version: u32,
    pub options: u32,
    pub parent: CurrencyId,
    pub name: String,
    pub launch_system_id: CurrencyId,
    pub system_id: CurrencyId,
    pub notarization_protocol: u32,
    pub proof_protocol: u32,
    pub native_currency: TransferDestination,
    pub pre_allocations: Vec<(CurrencyId, u64)>,
}

impl CurrencyDefinition {
    pub fn is_nft(&self) -> bool {
        self.options & OPTION_NFT_TOKEN != 0
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        cursor::write_u32_le(out, self.version);
        cursor::write_u32_le(out, self.options);
        cursor::write_id(out, &self.parent);
        cursor::write_var_bytes(out, self.name.as_bytes());
        cursor::write_id(out, &self.launch_system_id);
        cursor::write_id(out, &self.system_id);
        cursor::write_u32_le(out, self.notarization_protocol);
        cursor::write_u32_le(out, self.proof_protocol);
        self.native_currency.encode(out);
        cursor::write_compact_size(out, self.pre_allocations.len() as u64);
        for (id, amount) in &self.pre_allocations {
            cursor::write_id(out, id);
            cursor::write_u64_le(out, *amount);
        }
    }

    /// Decode a definition nested at `depth`. Its native-currency
    /// destination is decoded at the same depth.
    pub fn decode(r: &mut Reader<'_>, depth: usize, max_depth: usize) -> Result<Self, CodecError> {
        let version = r.read_u32_le()?;
        let options = r.read_u32_le()?;
        let parent = r.read_id()?;
        let name_bytes = r.read_var_bytes()?;
        if name_bytes.len() > MAX_NAME_LEN {
            return Err(CodecError::InvalidCurrencyDefinition(format!(
                "name is {} bytes, limit {MAX_NAME_LEN}",
                name_bytes.len()
            )));
        }
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| CodecError::InvalidCurrencyDefinition("name is not UTF-8".into()))?
            .to_owned();
        let launch_system_id = r.read_id()?;
        let system_id = r.read_id()?;
        let notarization_protocol = r.read_u32_le()?;
        let proof_protocol = r.read_u32_le()?;
        let native_currency = TransferDestination::decode(r, depth, max_depth)?;
        let count = r.read_count(CurrencyId::LEN + 8)?;
        let mut pre_allocations = Vec::with_capacity(count);
        for _ in 0..count {
            pre_allocations.push((r.read_id()?, r.read_amount()?));
        }
        Ok(Self {
            version,
            options,
            parent,
            name,
            launch_system_id,
            system_id,
            notarization_protocol,
            proof_protocol,
            native_currency,
            pre_allocations,
        })
    }
}

/// Host-chain token mapping for a currency launched over the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchToken {
    pub iaddress: CurrencyId,
    pub parent: CurrencyId,
    pub name: String,
    /// External token contract, zero when the currency originates on the
    /// source chain.
    pub contract: CurrencyId,
    pub flags: u32,
    pub token_id: [u8; 32],
}

impl LaunchToken {
    pub fn from_definition(iaddress: CurrencyId, def: &CurrencyDefinition) -> Self {
        let native = &def.native_currency;
        let (contract, flags, token_id) = match native.kind {
            DestinationKind::Eth => (
                native.as_id().unwrap_or(CurrencyId::ZERO),
                mapping::ETHEREUM_OWNED | mapping::ERC20,
                TOKEN_ID_NONE,
            ),
            DestinationKind::EthNft => {
                let bytes = &native.destination_bytes;
                let contract = bytes.get(..CurrencyId::LEN).unwrap_or_default();
                let mut token_id = TOKEN_ID_NONE;
                if let Some(id) = bytes.get(CurrencyId::LEN..CurrencyId::LEN + 32) {
                    token_id.copy_from_slice(id);
                }
                let kind = if def.is_nft() {
                    mapping::ERC721
                } else {
                    mapping::ERC1155
                };
                (
                    CurrencyId::from_slice(contract).unwrap_or(CurrencyId::ZERO),
                    mapping::ETHEREUM_OWNED | kind,
                    token_id,
                )
            }
            _ if def.is_nft() => (
                CurrencyId::ZERO,
                mapping::VERUS_OWNED | mapping::ERC721,
                iaddress.to_word(),
            ),
            _ => (
                CurrencyId::ZERO,
                mapping::VERUS_OWNED | mapping::ERC20,
                TOKEN_ID_NONE,
            ),
        };
        Self {
            iaddress,
            parent: def.parent,
            name: def.name.clone(),
            contract,
            flags,
            token_id,
        }
    }

    pub fn has_token_id(&self) -> bool {
        self.token_id != TOKEN_ID_NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(native: TransferDestination, options: u32) -> CurrencyDefinition {
        CurrencyDefinition {
            version: 1,
            options,
            parent: CurrencyId::new([1; 20]),
            name: "Bridge.vETH".into(),
            launch_system_id: CurrencyId::new([1; 20]),
            system_id: CurrencyId::new([1; 20]),
            notarization_protocol: 2,
            proof_protocol: 3,
            native_currency: native,
            pre_allocations: vec![(CurrencyId::new([4; 20]), 5_000)],
        }
    }

    #[test]
    fn definition_roundtrips_inside_destination() {
        let def = definition(TransferDestination::eth(CurrencyId::new([9; 20])), 0);
        let dest = TransferDestination::register_currency(&def);
        assert_eq!(dest.currency_definition(1).unwrap(), def);
    }

    #[test]
    fn overlong_name_rejected() {
        let mut def = definition(TransferDestination::raw(vec![]), 0);
        def.name = "x".repeat(MAX_NAME_LEN + 1);
        let mut out = Vec::new();
        def.encode(&mut out);
        assert!(matches!(
            CurrencyDefinition::decode(&mut Reader::new(&out), 1, 1),
            Err(CodecError::InvalidCurrencyDefinition(_))
        ));
    }

    #[test]
    fn non_utf8_name_rejected() {
        let mut out = Vec::new();
        cursor::write_u32_le(&mut out, 1);
        cursor::write_u32_le(&mut out, 0);
        cursor::write_id(&mut out, &CurrencyId::ZERO);
        cursor::write_var_bytes(&mut out, &[0xFF, 0xFE]);
        assert!(matches!(
            CurrencyDefinition::decode(&mut Reader::new(&out), 1, 1),
            Err(CodecError::InvalidCurrencyDefinition(_))
        ));
    }

    #[test]
    fn eth_native_maps_to_erc20_with_contract() {
        let contract = CurrencyId::new([9; 20]);
        let iaddr = CurrencyId::new([7; 20]);
        let token = LaunchToken::from_definition(
            iaddr,
            &definition(TransferDestination::eth(contract), 0),
        );
        assert_eq!(token.contract, contract);
        assert_eq!(token.flags, mapping::ETHEREUM_OWNED | mapping::ERC20);
        assert!(!token.has_token_id());
        assert_eq!(token.iaddress, iaddr);
    }

    #[test]
    fn eth_nft_native_selects_721_or_1155() {
        let mut payload = vec![9u8; 20];
        payload.extend_from_slice(&[3u8; 32]);
        let native = TransferDestination::new(DestinationKind::EthNft, payload);

        let nft = LaunchToken::from_definition(
            CurrencyId::ZERO,
            &definition(native.clone(), OPTION_NFT_TOKEN),
        );
        assert_eq!(nft.flags, mapping::ETHEREUM_OWNED | mapping::ERC721);
        assert_eq!(nft.token_id, [3u8; 32]);
        assert_eq!(nft.contract, CurrencyId::new([9; 20]));

        let multi = LaunchToken::from_definition(CurrencyId::ZERO, &definition(native, 0));
        assert_eq!(multi.flags, mapping::ETHEREUM_OWNED | mapping::ERC1155);
    }

    #[test]
    fn source_chain_currencies() {
        let iaddr = CurrencyId::new([7; 20]);
        let nft = LaunchToken::from_definition(
            iaddr,
            &definition(TransferDestination::raw(vec![]), OPTION_NFT_TOKEN),
        );
        assert_eq!(nft.flags, mapping::VERUS_OWNED | mapping::ERC721);
        assert_eq!(nft.token_id, iaddr.to_word());
        assert!(nft.contract.is_zero());

        let fungible =
            LaunchToken::from_definition(iaddr, &definition(TransferDestination::raw(vec![]), 0));
        assert_eq!(fungible.flags, mapping::VERUS_OWNED | mapping::ERC20);
        assert_eq!(fungible.token_id, TOKEN_ID_NONE);
    }
}
