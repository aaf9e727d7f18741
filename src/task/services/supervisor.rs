//! Connection supervision: gating mutations on wallet and network state.

use crate::task::domain::{Address, NetworkId};
use crate::task::ports::{WalletSession, WalletSessionError, WalletSessionResult};
use std::sync::Arc;

/// Readiness of the wallet connection for orchestrated mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No account is connected.
    Disconnected,
    /// An account is connected, but on an unsupported network.
    WrongNetwork {
        /// Network the wallet is currently on.
        connected: NetworkId,
    },
    /// An account is connected on the supported network.
    Ready {
        /// The connected account.
        account: Address,
    },
}

impl ConnectionStatus {
    /// Returns `true` when mutations may proceed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Observes the wallet connection and gates the orchestrator.
///
/// The supervisor never owns connection state: every status read consults
/// the wallet port, so connect and disconnect performed through the wallet
/// are visible immediately.
#[derive(Clone)]
pub struct ConnectionSupervisor<W>
where
    W: WalletSession,
{
    wallet: Arc<W>,
    supported_network: NetworkId,
}

impl<W> ConnectionSupervisor<W>
where
    W: WalletSession,
{
    /// Creates a supervisor for the single supported network.
    #[must_use]
    pub const fn new(wallet: Arc<W>, supported_network: NetworkId) -> Self {
        Self {
            wallet,
            supported_network,
        }
    }

    /// Returns the current connection readiness.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        let Some(account) = self.wallet.connected_account() else {
            return ConnectionStatus::Disconnected;
        };
        match self.wallet.connected_network() {
            Some(network) if network == self.supported_network => {
                ConnectionStatus::Ready { account }
            }
            Some(network) => ConnectionStatus::WrongNetwork { connected: network },
            None => ConnectionStatus::Disconnected,
        }
    }

    /// Returns `true` when mutations may proceed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status().is_ready()
    }

    /// Returns the single supported network.
    #[must_use]
    pub const fn supported_network(&self) -> NetworkId {
        self.supported_network
    }

    /// Asks the wallet to switch to the supported network when it is
    /// connected elsewhere.
    ///
    /// A declined or failed switch is reported, never escalated: the
    /// orchestrator simply stays gated until the mismatch resolves.
    ///
    /// # Errors
    ///
    /// Returns [`WalletSessionError::Disconnected`] when no account is
    /// connected, or the wallet's error when the switch is declined or the
    /// provider fails.
    pub async fn switch_to_supported_network(&self) -> WalletSessionResult<()> {
        match self.status() {
            ConnectionStatus::Disconnected => Err(WalletSessionError::Disconnected),
            ConnectionStatus::Ready { .. } => Ok(()),
            ConnectionStatus::WrongNetwork { connected } => {
                tracing::debug!(
                    connected = connected.value(),
                    supported = self.supported_network.value(),
                    "requesting wallet network switch"
                );
                self.wallet
                    .request_network_switch(self.supported_network)
                    .await
                    .inspect_err(|err| {
                        tracing::warn!(error = %err, "wallet network switch failed");
                    })
            }
        }
    }
}
