//! Wallet connection → request context.
//!
//! The chat send path takes the context as a plain argument; callers build
//! it from whatever wallet state they hold at the moment of sending.

use crate::protocol::ChatContext;

/// Snapshot of the currently connected wallet, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletConnection {
    pub address: Option<String>,
    pub chain_id: Option<u64>,
}

impl WalletConnection {
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn connected(address: impl Into<String>, chain_id: Option<u64>) -> Self {
        Self { address: Some(address.into()), chain_id }
    }
}

impl ChatContext {
    /// Build a fresh context: `from` if an address is known, `chain_ids`
    /// holding the active chain if one is known.
    #[must_use]
    pub fn from_wallet(wallet: &WalletConnection) -> Self {
        Self {
            from: wallet.address.clone().filter(|a| !a.trim().is_empty()),
            chain_ids: wallet.chain_id.map(|id| vec![id]),
        }
    }
}

impl From<&WalletConnection> for ChatContext {
    fn from(wallet: &WalletConnection) -> Self {
        Self::from_wallet(wallet)
    }
}
