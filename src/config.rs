//! Deployment configuration for the task client.

use crate::task::domain::{Address, NetworkId};
use std::time::Duration;

/// Chain id of the test network the reference contract is deployed to.
pub const SEPOLIA_NETWORK_ID: u64 = 11_155_111;

/// Static configuration binding the client to one contract deployment.
///
/// Exactly one network is supported; the orchestrator rejects mutations
/// while the wallet is connected anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    contract_address: Address,
    supported_network: NetworkId,
    confirmation_timeout: Option<Duration>,
}

impl ChainConfig {
    /// Creates a configuration for a deployed contract on its network.
    ///
    /// Confirmation awaiting starts unbounded; see
    /// [`with_confirmation_timeout`](Self::with_confirmation_timeout).
    #[must_use]
    pub const fn new(contract_address: Address, supported_network: NetworkId) -> Self {
        Self {
            contract_address,
            supported_network,
            confirmation_timeout: None,
        }
    }

    /// Bounds the confirmation wait.
    ///
    /// When the bound expires the mutation fails with a timeout and its
    /// in-flight marker is released, even though the broadcast transaction
    /// may still confirm later; the next successful refresh reconciles.
    #[must_use]
    pub const fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }

    /// Returns the deployed contract's address.
    #[must_use]
    pub const fn contract_address(&self) -> &Address {
        &self.contract_address
    }

    /// Returns the single supported network.
    #[must_use]
    pub const fn supported_network(&self) -> NetworkId {
        self.supported_network
    }

    /// Returns the configured confirmation bound, if any.
    #[must_use]
    pub const fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainConfig, SEPOLIA_NETWORK_ID};
    use crate::task::domain::{Address, NetworkId};
    use std::time::Duration;

    fn deployment() -> ChainConfig {
        let contract = Address::new("0x689e4e0d141fac9034ffaddc9f1d83035f88f9ac")
            .expect("valid contract address");
        let network = NetworkId::new(SEPOLIA_NETWORK_ID).expect("valid network id");
        ChainConfig::new(contract, network)
    }

    #[test]
    fn confirmation_waits_are_unbounded_by_default() {
        assert!(deployment().confirmation_timeout().is_none());
    }

    #[test]
    fn confirmation_bound_is_preserved() {
        let config = deployment().with_confirmation_timeout(Duration::from_secs(90));
        assert_eq!(
            config.confirmation_timeout(),
            Some(Duration::from_secs(90))
        );
    }

    #[test]
    fn deployment_values_are_preserved() {
        let config = deployment();
        assert_eq!(config.supported_network().value(), SEPOLIA_NETWORK_ID);
        assert_eq!(
            config.contract_address().as_str(),
            "0x689e4e0d141fac9034ffaddc9f1d83035f88f9ac"
        );
    }
}
