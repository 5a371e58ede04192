//! Nullable token manager: records every call, changes nothing.

use xbridge_codec::{LaunchToken, ReserveTransfer};
use xbridge_settlement::{ImportKey, TokenManager};

/// One call the settlement layer made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenCall {
    Apply {
        key: ImportKey,
        transfer: ReserveTransfer,
    },
    Launch(Vec<LaunchToken>),
}

#[derive(Debug, Default)]
pub struct NullTokenManager {
    calls: Vec<TokenCall>,
}

impl NullTokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[TokenCall] {
        &self.calls
    }

    /// Keys of every applied transfer, in call order.
    pub fn applied_keys(&self) -> Vec<ImportKey> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                TokenCall::Apply { key, .. } => Some(*key),
                TokenCall::Launch(_) => None,
            })
            .collect()
    }

    /// Every launched token, flattened across calls.
    pub fn launched(&self) -> Vec<LaunchToken> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                TokenCall::Launch(tokens) => Some(tokens.iter().cloned()),
                TokenCall::Apply { .. } => None,
            })
            .flatten()
            .collect()
    }

    pub fn is_untouched(&self) -> bool {
        self.calls.is_empty()
    }
}

impl TokenManager for NullTokenManager {
    fn apply_transfer_effect(&mut self, key: ImportKey, transfer: &ReserveTransfer) {
        self.calls.push(TokenCall::Apply {
            key,
            transfer: transfer.clone(),
        });
    }

    fn launch_currencies(&mut self, tokens: &[LaunchToken]) {
        self.calls.push(TokenCall::Launch(tokens.to_vec()));
    }
}
