//! Ordered currency → amount maps.
//!
//! Two wire forms exist. The multi-value form is a compact-size count
//! followed by `id ‖ u64le` pairs; the single-value fast path is exactly one
//! `id ‖ VARINT` pair with no count. Entry order is the wire order and is
//! preserved so that re-encoding is byte-exact.

use serde::{Deserialize, Serialize};
use xbridge_types::CurrencyId;

use crate::cursor::{self, check_amount, Reader};
use crate::error::CodecError;

const MULTI_ENTRY_LEN: usize = CurrencyId::LEN + 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyValueMap {
    entries: Vec<(CurrencyId, u64)>,
    multivalue: bool,
}

impl Default for CurrencyValueMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyValueMap {
    /// An empty multi-value map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            multivalue: true,
        }
    }

    /// The single-entry fast-path form.
    pub fn single(currency: CurrencyId, amount: u64) -> Self {
        Self {
            entries: vec![(currency, amount)],
            multivalue: false,
        }
    }

    /// Build from explicit entries, enforcing the map invariants.
    pub fn from_entries(
        entries: Vec<(CurrencyId, u64)>,
        multivalue: bool,
    ) -> Result<Self, CodecError> {
        let map = Self { entries, multivalue };
        map.validate()?;
        Ok(map)
    }

    pub fn is_multivalue(&self) -> bool {
        self.multivalue
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, currency: &CurrencyId) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == currency)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyId, u64)> {
        self.entries.iter().map(|(id, amount)| (id, *amount))
    }

    /// Add `amount` to `currency`, appending a new entry if absent. Converts
    /// the map to the multi-value form once a second currency appears.
    pub fn add(&mut self, currency: CurrencyId, amount: u64) -> Result<(), CodecError> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(id, _)| *id == currency) {
            let sum = existing
                .checked_add(amount)
                .ok_or(CodecError::AmountOutOfRange(u64::MAX))?;
            check_amount(sum)?;
            *existing = sum;
            return Ok(());
        }
        check_amount(amount)?;
        self.entries.push((currency, amount));
        if self.entries.len() > 1 {
            self.multivalue = true;
        }
        Ok(())
    }

    /// Sum every entry of `other` into this map.
    pub fn merge(&mut self, other: &CurrencyValueMap) -> Result<(), CodecError> {
        for (id, amount) in other.iter() {
            self.add(*id, amount)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if !self.multivalue && self.entries.len() != 1 {
            return Err(CodecError::SingleValueCardinality(self.entries.len()));
        }
        for (i, (id, amount)) in self.entries.iter().enumerate() {
            check_amount(*amount)?;
            if self.entries[..i].iter().any(|(other, _)| other == id) {
                return Err(CodecError::DuplicateCurrency(*id));
            }
        }
        Ok(())
    }

    /// Serialized length in bytes.
    pub fn encoded_len(&self) -> usize {
        let mut out = Vec::new();
        self.encode(&mut out);
        out.len()
    }

    /// Append the wire form. The map must already be valid.
    pub fn encode(&self, out: &mut Vec<u8>) {
        if self.multivalue {
            cursor::write_compact_size(out, self.entries.len() as u64);
            for (id, amount) in &self.entries {
                cursor::write_id(out, id);
                cursor::write_u64_le(out, *amount);
            }
        } else {
            for (id, amount) in &self.entries {
                cursor::write_id(out, id);
                cursor::write_varint(out, *amount);
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>, multivalue: bool) -> Result<Self, CodecError> {
        if !multivalue {
            let id = r.read_id()?;
            let amount = r.read_varint_amount()?;
            return Ok(Self::single(id, amount));
        }
        let count = r.read_count(MULTI_ENTRY_LEN)?;
        let mut map = Self {
            entries: Vec::with_capacity(count),
            multivalue: true,
        };
        for _ in 0..count {
            let id = r.read_id()?;
            let amount = r.read_amount()?;
            if map.get(&id).is_some() {
                return Err(CodecError::DuplicateCurrency(id));
            }
            map.entries.push((id, amount));
        }
        Ok(map)
    }
}
