//! Bridge core node library.
//!
//! Loads a [`BridgeConfig`] and composes the notarization ledger, the
//! governance tracker and the export/import manager into a [`BridgeCore`]
//! sharing one set of deployment parameters.

pub mod bridge;
pub mod config;
pub mod error;

pub use bridge::BridgeCore;
pub use config::{BridgeConfig, NotaryEntry};
pub use error::NodeError;
