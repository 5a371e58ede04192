//! The token-management collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};
use xbridge_codec::{LaunchToken, ReserveTransfer};
use xbridge_types::Hash256;

/// Source output an imported transfer came from. Each key is imported at
/// most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImportKey {
    pub txid: Hash256,
    pub vout: u32,
}

impl fmt::Display for ImportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// Host-side token bookkeeping an import delegates to.
///
/// Calls arrive only after every check of the enclosing import has passed,
/// so implementations must accept whatever they are given; refunds or
/// rejections are their own business.
pub trait TokenManager {
    fn apply_transfer_effect(&mut self, key: ImportKey, transfer: &ReserveTransfer);

    fn launch_currencies(&mut self, tokens: &[LaunchToken]);
}
