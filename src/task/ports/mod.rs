//! Port contracts for on-chain task management.
//!
//! Ports define infrastructure-agnostic interfaces to the deployed task
//! contract and the wallet connection.

pub mod contract;
pub mod wallet;

pub use contract::{
    ContractEvent, TASK_CREATED_EVENT, TaskContract, TaskContractError, TaskContractResult,
    TxHandle, TxReceipt,
};
pub use wallet::{WalletSession, WalletSessionError, WalletSessionResult};
