//! Cryptographic primitives for xbridge.
//!
//! - **BLAKE2b-256** for every digest in the core (Merkle nodes, record and
//!   proposal hashes, export commitments)
//! - **Ed25519** for notary attestation signatures
//! - **Base58Check** rendering of 20-byte identifiers (`i…` addresses)

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{
    decode_base58check, decode_iaddress, encode_base58check, encode_iaddress, AddressError,
    IADDRESS_VERSION,
};
pub use hash::{blake2b_256, blake2b_256_multi, hash_pair};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
