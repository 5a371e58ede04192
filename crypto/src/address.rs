//! Base58Check rendering of 20-byte chain identifiers.
//!
//! Format: base58(`version ‖ id(20) ‖ checksum(4)`) where the checksum is the
//! first four bytes of SHA-256(SHA-256(`version ‖ id`)). Identity and
//! currency ids use version byte 102, which renders with a leading `i`.
//! The core only ever handles the raw 20 bytes; this module exists for
//! configuration files, logs and operator tooling.

use sha2::{Digest, Sha256};
use thiserror::Error;
use xbridge_types::CurrencyId;

/// Version byte of identity / currency addresses.
pub const IADDRESS_VERSION: u8 = 102;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Reverse lookup table: ASCII byte → base58 digit (0xFF = invalid).
const BASE58_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 58 {
        table[BASE58_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),

    #[error("bad checksum")]
    BadChecksum,

    #[error("wrong version byte: expected {expected}, got {actual}")]
    WrongVersion { expected: u8, actual: u8 },

    #[error("wrong payload length: {0} bytes")]
    WrongLength(usize),
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

/// Encode bytes as base58 (no checksum).
fn encode_base58(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    // Little-endian base58 digits of the big-endian input number.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }
    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    out
}

/// Decode a base58 string (no checksum).
fn decode_base58(s: &str) -> Result<Vec<u8>, AddressError> {
    let zeros = s.bytes().take_while(|&c| c == b'1').count();
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars().skip(zeros) {
        let value = if (c as u32) < 128 {
            BASE58_DECODE[c as usize]
        } else {
            0xFF
        };
        if value == 0xFF {
            return Err(AddressError::InvalidCharacter(c));
        }
        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }
    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Render an identifier in Base58Check with the given version byte.
pub fn encode_base58check(version: u8, id: &CurrencyId) -> String {
    let mut payload = Vec::with_capacity(1 + CurrencyId::LEN + CHECKSUM_LEN);
    payload.push(version);
    payload.extend_from_slice(id.as_bytes());
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    encode_base58(&payload)
}

/// Parse a Base58Check identifier, requiring the given version byte.
pub fn decode_base58check(version: u8, s: &str) -> Result<CurrencyId, AddressError> {
    let raw = decode_base58(s)?;
    if raw.len() != 1 + CurrencyId::LEN + CHECKSUM_LEN {
        return Err(AddressError::WrongLength(raw.len()));
    }
    let (payload, check) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(AddressError::BadChecksum);
    }
    if payload[0] != version {
        return Err(AddressError::WrongVersion {
            expected: version,
            actual: payload[0],
        });
    }
    CurrencyId::from_slice(&payload[1..]).map_err(|_| AddressError::WrongLength(payload.len() - 1))
}

/// Render a currency / identity id as an `i…` address.
pub fn encode_iaddress(id: &CurrencyId) -> String {
    encode_base58check(IADDRESS_VERSION, id)
}

/// Parse an `i…` address into its raw 20-byte id.
pub fn decode_iaddress(s: &str) -> Result<CurrencyId, AddressError> {
    decode_base58check(IADDRESS_VERSION, s)
}
