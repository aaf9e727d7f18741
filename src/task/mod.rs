//! On-chain task management for Chainboard.
//!
//! This module implements the mutation orchestrator: submitting task
//! mutations (create, complete, delete, update) as transactions, awaiting
//! confirmation, and reconciling the local snapshot from the contract's
//! authoritative read path. At most one mutation per `(task, action)` pair
//! is in flight at any time. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
