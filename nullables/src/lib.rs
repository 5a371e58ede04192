//! Nullable collaborators and fixtures for deterministic bridge tests.
//!
//! Everything here is seeded and in-memory: notary keys derive from fixed
//! seeds, the token manager only records what it is asked to do, and
//! export proofs are assembled with the same builders a relayer would use.

pub mod exports;
pub mod notaries;
pub mod tokens;

pub use exports::{ExportFixture, FixtureError, SignedExport};
pub use notaries::NotaryFixture;
pub use tokens::{NullTokenManager, TokenCall};
