//! Chainboard: wallet-mediated on-chain task management.
//!
//! This crate provides the client core for a task list whose canonical
//! state lives in a smart contract: it turns user intents into submitted
//! transactions, tracks each transaction to finality, and reconciles local
//! state with the authoritative contract state.
//!
//! # Architecture
//!
//! Chainboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task and mutation vocabulary with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for the deployed contract and the
//!   wallet connection
//! - **Adapters**: Concrete implementations of ports (in-memory simulation
//!   for tests and local runs)
//! - **Services**: The transaction orchestrator, connection supervision,
//!   and session-scoped state
//!
//! # Modules
//!
//! - [`config`]: Deployment configuration (contract address, supported
//!   network, confirmation bound)
//! - [`task`]: The on-chain task domain and its mutation orchestrator

pub mod config;
pub mod task;
