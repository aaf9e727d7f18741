//! Shared fixtures for in-memory integration tests.

#![expect(
    clippy::expect_used,
    reason = "Test helpers use expect for fixture construction clarity"
)]

use chainboard::config::{ChainConfig, SEPOLIA_NETWORK_ID};
use chainboard::task::adapters::memory::{InMemoryTaskContract, InMemoryWallet};
use chainboard::task::domain::{Address, NetworkId, TaskAction, TaskId, TaskName};
use chainboard::task::services::TransactionOrchestrator;
use mockable::DefaultClock;
use std::sync::Arc;

/// Contract adapter type used across the integration suite.
pub type TestContract = InMemoryTaskContract<DefaultClock>;

/// Orchestrator type used across the integration suite.
pub type TestOrchestrator = TransactionOrchestrator<TestContract, InMemoryWallet>;

/// One wired client: contract, wallet, and orchestrator.
pub struct TestBoard {
    /// The simulated deployed contract.
    pub contract: Arc<TestContract>,
    /// The scriptable wallet.
    pub wallet: Arc<InMemoryWallet>,
    /// The orchestrator under test.
    pub orchestrator: Arc<TestOrchestrator>,
}

/// The single supported network.
pub fn supported_network() -> NetworkId {
    NetworkId::new(SEPOLIA_NETWORK_ID).expect("valid network id")
}

/// A network the deployment does not support.
pub fn other_network() -> NetworkId {
    NetworkId::new(1).expect("valid network id")
}

/// The connected test account.
pub fn account() -> Address {
    Address::new("0x1a9c8182c09f50c8318d769245bea52c32be35bc").expect("valid address")
}

/// The deployed contract address.
pub fn contract_address() -> Address {
    Address::new("0x689e4e0d141fac9034ffaddc9f1d83035f88f9ac").expect("valid address")
}

/// Builds a board with the wallet already connected on the given network.
pub fn board_on_network(network: NetworkId) -> TestBoard {
    let config = ChainConfig::new(contract_address(), supported_network());
    let contract = Arc::new(InMemoryTaskContract::new(Arc::new(DefaultClock)));
    let wallet = Arc::new(InMemoryWallet::connected(account(), network));
    let orchestrator = Arc::new(TransactionOrchestrator::new(
        Arc::clone(&contract),
        Arc::clone(&wallet),
        &config,
    ));
    TestBoard {
        contract,
        wallet,
        orchestrator,
    }
}

/// Builds a board ready for mutations.
pub fn ready_board() -> TestBoard {
    board_on_network(supported_network())
}

/// Creates a task through the full mutation path and returns its id.
pub async fn create_task(board: &TestBoard, name: &str) -> TaskId {
    let success = board
        .orchestrator
        .submit(TaskAction::Create {
            name: TaskName::new(name).expect("valid task name"),
        })
        .await
        .expect("create should settle");
    success.created_task_id().expect("creation event decoded")
}
