//! Byte cursor and primitive encodings shared by every wire record.
//!
//! Two variable-length integer forms appear in the format:
//! - `VARINT`: base-128, most significant group first, each continuation
//!   group carrying an implicit +1 so every value has exactly one encoding.
//! - `COMPACTSIZE`: one byte below `0xFD`, otherwise a marker byte followed
//!   by a little-endian u16 / u32 / u64. The shortest form is mandatory.

use xbridge_types::{CurrencyId, Hash256};

use crate::error::CodecError;

/// Largest amount the format carries (amounts are signed 64-bit on the
/// source chain).
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// Streaming reader over a caller-supplied buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    /// Fail unless at least `n` more bytes are available.
    pub fn require(&self, n: usize) -> Result<(), CodecError> {
        if n > self.remaining() {
            return Err(CodecError::Truncated {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        self.require(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// A fixed-width little-endian amount, bounded by [`MAX_AMOUNT`].
    pub fn read_amount(&mut self) -> Result<u64, CodecError> {
        let amount = self.read_u64_le()?;
        check_amount(amount)?;
        Ok(amount)
    }

    pub fn read_id(&mut self) -> Result<CurrencyId, CodecError> {
        Ok(CurrencyId::new(self.read_array()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash256, CodecError> {
        Ok(Hash256::new(self.read_array()?))
    }

    pub fn read_varint(&mut self) -> Result<u64, CodecError> {
        let start = self.pos;
        let mut n: u64 = 0;
        loop {
            let byte = self.read_u8()?;
            if n > (u64::MAX >> 7) {
                return Err(CodecError::VarIntOverflow(start));
            }
            n = (n << 7) | u64::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(n);
            }
            n = n.checked_add(1).ok_or(CodecError::VarIntOverflow(start))?;
        }
    }

    pub fn read_varint_u32(&mut self) -> Result<u32, CodecError> {
        let start = self.pos;
        let n = self.read_varint()?;
        u32::try_from(n).map_err(|_| CodecError::VarIntOverflow(start))
    }

    /// A `VARINT` amount, bounded by [`MAX_AMOUNT`].
    pub fn read_varint_amount(&mut self) -> Result<u64, CodecError> {
        let amount = self.read_varint()?;
        check_amount(amount)?;
        Ok(amount)
    }

    pub fn read_compact_size(&mut self) -> Result<u64, CodecError> {
        let start = self.pos;
        let (value, min) = match self.read_u8()? {
            0xFD => (u64::from(u16::from_le_bytes(self.read_array()?)), 0xFD),
            0xFE => (u64::from(u32::from_le_bytes(self.read_array()?)), 0x1_0000),
            0xFF => (u64::from_le_bytes(self.read_array()?), 0x1_0000_0000),
            b => return Ok(u64::from(b)),
        };
        if value < min {
            return Err(CodecError::NonCanonicalSize(start));
        }
        Ok(value)
    }

    /// A compact-size element count. Each element occupies at least
    /// `min_element_len` bytes, so counts the buffer cannot possibly hold
    /// are rejected before anything is allocated.
    pub fn read_count(&mut self, min_element_len: usize) -> Result<usize, CodecError> {
        let offset = self.pos;
        let count = self.read_compact_size()?;
        let needed = count.saturating_mul(min_element_len.max(1) as u64);
        if needed > self.remaining() as u64 {
            return Err(CodecError::Truncated {
                offset,
                needed: usize::try_from(needed).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            });
        }
        // Bounded by the buffer length above.
        Ok(count as usize)
    }

    /// A compact-size length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_count(1)?;
        self.read_bytes(len)
    }
}

pub fn check_amount(amount: u64) -> Result<(), CodecError> {
    if amount > MAX_AMOUNT {
        return Err(CodecError::AmountOutOfRange(amount));
    }
    Ok(())
}

// ── Writers ────────────────────────────────────────────────────────────

pub fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub fn write_u32_le(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_u64_le(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_id(out: &mut Vec<u8>, id: &CurrencyId) {
    out.extend_from_slice(id.as_bytes());
}

pub fn write_hash(out: &mut Vec<u8>, hash: &Hash256) {
    out.extend_from_slice(hash.as_bytes());
}

pub fn write_varint(out: &mut Vec<u8>, mut n: u64) {
    let mut tmp = [0u8; 10];
    let mut len = 0;
    loop {
        tmp[len] = (n & 0x7F) as u8 | if len > 0 { 0x80 } else { 0x00 };
        if n <= 0x7F {
            break;
        }
        n = (n >> 7) - 1;
        len += 1;
    }
    out.extend(tmp[..=len].iter().rev());
}

pub fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    if n < 0xFD {
        out.push(n as u8);
    } else if n <= 0xFFFF {
        out.push(0xFD);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xFFFF_FFFF {
        out.push(0xFE);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xFF);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
