//! Port for the deployed task contract: reads, submissions, confirmations.

use crate::task::domain::{Address, Task, TaskAction, TaskId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Name of the event the contract emits when a task is created.
pub const TASK_CREATED_EVENT: &str = "TaskCreated";

/// Result type for task contract operations.
pub type TaskContractResult<T> = Result<T, TaskContractError>;

/// Typed read/write handle to the deployed task contract.
///
/// Implementations wrap whatever transport reaches the chain node; the
/// orchestrator only depends on these three operations and their error
/// taxonomy.
///
/// # Implementation Notes
///
/// - `submit` covers the pre-broadcast path, including the wallet approval
///   prompt: a decline surfaces as [`TaskContractError::Rejected`] before
///   any transaction exists.
/// - `await_confirmation` resolves once the transaction is final enough to
///   be treated as authoritative; an on-chain revert surfaces as
///   [`TaskContractError::Reverted`].
#[async_trait]
pub trait TaskContract: Send + Sync {
    /// Reads the full task collection for an account, in the contract's
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskContractError::Transport`] when the read call fails.
    async fn fetch_tasks(&self, account: &Address) -> TaskContractResult<Vec<Task>>;

    /// Submits a mutation for signing and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`TaskContractError::Rejected`] when the signer declines
    /// before broadcast, or [`TaskContractError::Transport`] on transport
    /// failure.
    async fn submit(&self, action: &TaskAction, signer: &Address) -> TaskContractResult<TxHandle>;

    /// Awaits inclusion and confirmation of a submitted transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskContractError::Reverted`] when the transaction was
    /// included but reverted, [`TaskContractError::UnknownHandle`] for a
    /// handle this contract never issued, or
    /// [`TaskContractError::Transport`] on transport failure.
    async fn await_confirmation(&self, handle: &TxHandle) -> TaskContractResult<TxReceipt>;
}

/// Opaque handle to a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHandle(String);

impl TxHandle {
    /// Wraps a transaction hash issued by the chain.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A log record emitted by the contract during a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    /// Event name as declared by the contract.
    pub name: String,
    /// Task id carried by the event, when the adapter could decode one.
    pub task_id: Option<TaskId>,
}

impl ContractEvent {
    /// Creates an event record.
    #[must_use]
    pub fn new(name: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            name: name.into(),
            task_id,
        }
    }
}

/// Receipt of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    handle: TxHandle,
    events: Vec<ContractEvent>,
}

impl TxReceipt {
    /// Creates a receipt for a confirmed transaction.
    #[must_use]
    pub const fn new(handle: TxHandle, events: Vec<ContractEvent>) -> Self {
        Self { handle, events }
    }

    /// Returns the confirmed transaction's handle.
    #[must_use]
    pub const fn handle(&self) -> &TxHandle {
        &self.handle
    }

    /// Returns the emitted events.
    #[must_use]
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Looks up the id assigned by a task-creation event.
    ///
    /// Best-effort: adapters are not required to decode logs, and the
    /// authoritative state comes from the read path regardless.
    #[must_use]
    pub fn created_task_id(&self) -> Option<TaskId> {
        self.events
            .iter()
            .find(|event| event.name == TASK_CREATED_EVENT)
            .and_then(|event| event.task_id)
    }
}

/// Errors returned by task contract implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskContractError {
    /// The signer declined the transaction before broadcast.
    #[error("signer rejected the transaction: {message}")]
    Rejected {
        /// Wallet-provided decline message.
        message: String,
    },

    /// The transaction was included but reverted on chain.
    #[error("transaction reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted {
        /// Contract-provided revert reason, when available.
        reason: Option<String>,
    },

    /// The handle was not issued by this contract instance.
    #[error("unknown transaction handle: {0}")]
    UnknownHandle(TxHandle),

    /// Transport-layer failure.
    #[error("contract transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskContractError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
