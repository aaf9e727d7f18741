//! In-memory port adapters for tests and local runs.

mod contract;
mod wallet;

pub use contract::InMemoryTaskContract;
pub use wallet::InMemoryWallet;
