//! Port for the wallet connection observed by the orchestrator.

use crate::task::domain::{Address, NetworkId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for wallet session operations.
pub type WalletSessionResult<T> = Result<T, WalletSessionError>;

/// Observable wallet connection state and network-switch requests.
///
/// The wallet owns key material and the connection lifecycle; this port
/// only observes the connected account and network and asks the wallet to
/// change networks. Connection state reads are synchronous snapshots of
/// whatever the wallet last reported.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Returns the connected account, or `None` when disconnected.
    fn connected_account(&self) -> Option<Address>;

    /// Returns the network the wallet is currently on, or `None` when
    /// disconnected.
    fn connected_network(&self) -> Option<NetworkId>;

    /// Asks the wallet to switch to the given network.
    ///
    /// # Errors
    ///
    /// Returns [`WalletSessionError::Disconnected`] when no account is
    /// connected, [`WalletSessionError::SwitchRejected`] when the user or
    /// wallet declines the switch, or [`WalletSessionError::Transport`] on
    /// provider failure.
    async fn request_network_switch(&self, target: NetworkId) -> WalletSessionResult<()>;
}

/// Errors returned by wallet session implementations.
#[derive(Debug, Clone, Error)]
pub enum WalletSessionError {
    /// No account is connected.
    #[error("no wallet account is connected")]
    Disconnected,

    /// The user or wallet declined the network switch.
    #[error("network switch rejected: {message}")]
    SwitchRejected {
        /// Wallet-provided decline message.
        message: String,
    },

    /// Provider transport failure.
    #[error("wallet transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl WalletSessionError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
