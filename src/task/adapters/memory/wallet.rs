//! In-memory wallet session for connection and network-switch tests.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::task::domain::{Address, NetworkId};
use crate::task::ports::{WalletSession, WalletSessionError, WalletSessionResult};

#[derive(Debug, Default)]
struct WalletState {
    account: Option<Address>,
    network: Option<NetworkId>,
    switch_denial: Option<String>,
}

/// Scriptable in-memory [`WalletSession`] implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWallet {
    state: Arc<RwLock<WalletState>>,
}

impl InMemoryWallet {
    /// Creates a disconnected wallet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wallet already connected to the given account and network.
    #[must_use]
    pub fn connected(account: Address, network: NetworkId) -> Self {
        let wallet = Self::new();
        wallet.connect(account, network);
        wallet
    }

    /// Connects an account on a network.
    pub fn connect(&self, account: Address, network: NetworkId) {
        let mut state = self.write_state();
        state.account = Some(account);
        state.network = Some(network);
    }

    /// Disconnects the wallet.
    pub fn disconnect(&self) {
        let mut state = self.write_state();
        state.account = None;
        state.network = None;
    }

    /// Moves the wallet to another network, as a user would from the
    /// wallet's own UI.
    pub fn set_network(&self, network: NetworkId) {
        self.write_state().network = Some(network);
    }

    /// Scripts the next switch request to be declined.
    pub fn deny_network_switch(&self, message: impl Into<String>) {
        self.write_state().switch_denial = Some(message.into());
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, WalletState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, WalletState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WalletSession for InMemoryWallet {
    fn connected_account(&self) -> Option<Address> {
        self.read_state().account.clone()
    }

    fn connected_network(&self) -> Option<NetworkId> {
        self.read_state().network
    }

    async fn request_network_switch(&self, target: NetworkId) -> WalletSessionResult<()> {
        let mut state = self.write_state();
        if state.account.is_none() {
            return Err(WalletSessionError::Disconnected);
        }
        if let Some(message) = state.switch_denial.take() {
            return Err(WalletSessionError::SwitchRejected { message });
        }
        state.network = Some(target);
        Ok(())
    }
}
